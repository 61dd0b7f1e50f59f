use std::collections::HashMap;

use witness_core::lang::errors;
use witness_core::lang::keywords;
use witness_core::lang::kinds::Kind;
use witness_core::lang::registry::FIRST_SYMBOL_CODE;
use witness_core::lang::symbols;
use witness_core::lang::tokens;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        let canonical = info.item.canonical;
        assert_eq!(
            keywords::from_str(canonical),
            Some(info.item.id),
            "keyword canonical spelling not resolvable: {}",
            canonical
        );
        assert_eq!(
            keywords::as_str(info.item.id),
            canonical,
            "keyword as_str mismatch for {:?}",
            info.item.id
        );

        if let Some(prev) = seen.insert(canonical, info.item.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", canonical, prev, info.item.id);
        }
    }
}

#[test]
fn exceptions_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, errors::ExceptionKind> = HashMap::new();

    for info in errors::EXCEPTIONS {
        let canonical = info.item.canonical;
        assert_eq!(
            errors::from_str(canonical),
            Some(info.item.id),
            "exception canonical spelling not resolvable: {}",
            canonical
        );
        if let Some(prev) = seen.insert(canonical, info.item.id) {
            panic!("duplicate exception spelling {:?}: {:?} and {:?}", canonical, prev, info.item.id);
        }
    }
}

#[test]
fn exception_bases_precede_subclasses() {
    for (index, info) in errors::EXCEPTIONS.iter().enumerate() {
        match info.base {
            None => assert_eq!(info.item.id, errors::ExceptionKind::Exception),
            Some(base) => {
                let base_index = errors::EXCEPTIONS
                    .iter()
                    .position(|other| other.item.id == base)
                    .expect("base is registered");
                assert!(base_index < index, "{} listed before its base", info.item.canonical);
                assert!(errors::is_subclass(info.item.id, errors::ExceptionKind::Exception));
            }
        }
    }
}

#[test]
fn token_codes_unique_and_below_symbol_range() {
    let mut seen: HashMap<u16, tokens::TokenId> = HashMap::new();

    for info in tokens::TOKENS {
        assert!(
            info.code < FIRST_SYMBOL_CODE,
            "token code out of range: {}",
            info.item.canonical
        );
        assert_eq!(tokens::from_code(info.code), Some(info.item.id));
        assert_eq!(tokens::from_name(info.item.canonical), Some(info.item.id));
        if let Some(prev) = seen.insert(info.code, info.item.id) {
            panic!("duplicate token code {}: {:?} and {:?}", info.code, prev, info.item.id);
        }
    }
}

#[test]
fn token_spellings_resolve_back() {
    for info in tokens::TOKENS {
        if let Some(spelling) = info.spelling {
            assert_eq!(
                tokens::from_spelling(spelling),
                Some(info.item.id),
                "spelling {:?} resolves elsewhere",
                spelling
            );
        }
        for &legacy in info.legacy_spellings {
            assert_eq!(tokens::from_spelling(legacy), Some(info.item.id));
        }
    }
}

#[test]
fn symbol_codes_unique_and_in_symbol_range() {
    let mut seen: HashMap<&'static str, symbols::SymbolId> = HashMap::new();

    for info in symbols::SYMBOLS {
        assert!(info.code >= FIRST_SYMBOL_CODE, "symbol code out of range: {}", info.item.canonical);
        assert_eq!(symbols::from_code(info.code), Some(info.item.id));
        assert_eq!(symbols::from_name(info.item.canonical), Some(info.item.id));
        if let Some(prev) = seen.insert(info.item.canonical, info.item.id) {
            panic!("duplicate symbol name {:?}: {:?} and {:?}", info.item.canonical, prev, info.item.id);
        }
    }
}

#[test]
fn kind_names_and_codes_round_trip() {
    let kinds = tokens::TOKENS
        .iter()
        .map(|info| Kind::Token(info.item.id))
        .chain(symbols::SYMBOLS.iter().map(|info| Kind::Symbol(info.item.id)));
    for kind in kinds {
        assert_eq!(Kind::from_code(kind.code()), Some(kind));
        assert_eq!(Kind::from_name(kind.name()), Some(kind), "name {} is ambiguous", kind.name());
    }
}
