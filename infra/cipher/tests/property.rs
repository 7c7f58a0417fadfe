use lss_cipher::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_transform_is_self_inverse(
        key in proptest::collection::vec(any::<u8>(), 1..256),
        data in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        let cipher = Rc4::new(&key).unwrap();
        let encoded = cipher.transform(&data);

        prop_assert_eq!(encoded.len(), data.len());
        prop_assert_eq!(cipher.transform(&encoded), data);
    }

    #[test]
    fn test_byte_strings_preserve_char_count(
        key in proptest::collection::vec(any::<u8>(), 1..64),
        text in "[\\x00-\\xff]{0,256}",
    ) {
        let cipher = Rc4::new(&key).unwrap();
        let encoded = cipher.transform_str(&text).unwrap();

        prop_assert_eq!(encoded.chars().count(), text.chars().count());
        prop_assert_eq!(cipher.transform_str(&encoded).unwrap(), text);
    }
}
