use proptest::prelude::*;
use shortly_core::identifier::{ALPHABET, ID_LEN, SUFFIX_LEN};
use shortly_core::Identifier;

use crate::{url_suffix, Generator, UrlIdGenerator};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn any_url_yields_a_valid_identifier(url in "\\PC{1,200}", seed in any::<u64>()) {
        let id = UrlIdGenerator::with_seed(seed).generate(&url);

        prop_assert_eq!(id.as_str().len(), ID_LEN);
        prop_assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        prop_assert!(Identifier::new(id.as_str()).is_ok());
    }

    #[test]
    fn suffix_depends_only_on_url(url in "\\PC{1,200}", a in any::<u64>(), b in any::<u64>()) {
        let first = UrlIdGenerator::with_seed(a).generate(&url);
        let second = UrlIdGenerator::with_seed(b).generate(&url);
        let expected = url_suffix(&url);

        prop_assert_eq!(first.suffix(), expected.as_str());
        prop_assert_eq!(second.suffix(), expected.as_str());
        prop_assert_eq!(expected.len(), SUFFIX_LEN);
    }
}
