pub mod fixtures;

use fixtures::fixed_cipher;
use lss_cipher::latin1;
use lss_cipher::prelude::*;

#[test]
fn test_encode_then_decode_with_same_key() {
    let cipher = Rc4::new(b"K").unwrap();

    let encoded = cipher.transform_str("AB").unwrap();
    assert_eq!(encoded, "\u{55}\u{ef}");
    assert_eq!(cipher.transform_str(&encoded).unwrap(), "AB");
}

#[test]
fn test_decode_with_other_key_differs() {
    let encoded = Rc4::new(b"K").unwrap().transform_str("AB").unwrap();
    let decoded = Rc4::new(b"L").unwrap().transform_str(&encoded).unwrap();

    assert_ne!(decoded, "AB");
}

#[test]
fn test_free_function_matches_bound_cipher() {
    let cipher = fixed_cipher();
    let data = b"example.org";

    let bound = cipher.transform(data);
    let one_shot = lss_cipher::transform(b"fixture-session-key", data).unwrap();
    assert_eq!(bound, one_shot);
}

#[test]
fn test_session_key_drives_cipher() {
    let key = SessionKey::generate(DEFAULT_KEY_LENGTH).unwrap();
    let restored = SessionKey::from_channel(&key.to_channel()).unwrap();

    let a = Rc4::new(&key).unwrap();
    let b = Rc4::new(&restored).unwrap();
    assert_eq!(a.transform(b"payload"), b.transform(b"payload"));
}

#[test]
fn test_utf8_text_round_trips_through_byte_strings() {
    let cipher = fixed_cipher();
    let plaintext = "Ünïcødé ✓";

    let scrambled = latin1::encode(&cipher.transform(plaintext.as_bytes()));
    assert!(latin1::is_byte_string(&scrambled));

    let bytes = cipher.transform(latin1::decode(&scrambled).unwrap());
    assert_eq!(String::from_utf8(bytes).unwrap(), plaintext);
}

#[test]
fn test_wide_input_is_invalid() {
    let result = fixed_cipher().transform_str("✓");
    assert!(matches!(result, Err(CipherError::InvalidInput { .. })));
}
