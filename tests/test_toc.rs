//! Integration tests for the table-of-contents codec.

use manuscript_ingest::contributors::{Contributor, Role};
use manuscript_ingest::toc::{
    decode_toc, encode_toc, included, placeholders, Inclusion, TocEntry,
};
use manuscript_ingest::Error;
use proptest::prelude::*;

fn entry(include: Inclusion, title: &str, contributors: &str) -> TocEntry {
    TocEntry {
        include,
        title: title.to_string(),
        contributors: contributors.to_string(),
        genre: "prose".to_string(),
        language: "he".to_string(),
        rights: "public_domain".to_string(),
    }
}

#[test]
fn test_encode_matches_stored_format() {
    let entries = vec![entry(Inclusion::Include, "Work 1", "")];
    assert_eq!(
        encode_toc(&entries),
        "yes||Work 1||||prose||he||public_domain"
    );
}

#[test]
fn test_decode_stored_buffer_with_padding() {
    let buffer = " yes || Test Work || || prose || he || public_domain";
    let entries = decode_toc(buffer).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].include, Inclusion::Include);
    assert_eq!(entries[0].title, "Test Work");
    assert_eq!(entries[0].contributors, "");
    assert_eq!(entries[0].rights, "public_domain");
}

#[test]
fn test_decode_skips_blank_lines() {
    let buffer = "\nyes||A||||prose||he||\n\n\nno||B||||poetry||he||\n";
    let entries = decode_toc(buffer).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].title, "B");
}

#[test]
fn test_decode_embedded_contributor_json_survives() {
    let contributors = vec![Contributor {
        seqno: 1,
        authority_id: Some(42),
        authority_name: "יוצר".to_string(),
        role: Role::Author,
    }];
    let json = serde_json::to_string(&contributors).unwrap();
    let entries = vec![entry(Inclusion::Include, "Work", &json)];

    let decoded = decode_toc(&encode_toc(&entries)).unwrap();
    let parsed: Vec<Contributor> = serde_json::from_str(&decoded[0].contributors).unwrap();
    assert_eq!(parsed, contributors);
}

#[test]
fn test_wrong_arity_is_an_error() {
    let err = decode_toc("yes||too||short").unwrap_err();
    match err {
        Error::Toc { line, ref reason } => {
            assert_eq!(line, 1);
            assert!(reason.contains("found 3"));
        },
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_titles_with_escape_sequences_pass_through() {
    let entries = vec![entry(Inclusion::Include, r"\[מבוף מעל העיר\] \*כוכב\*", "")];
    let decoded = decode_toc(&encode_toc(&entries)).unwrap();
    assert_eq!(decoded, entries);
}

#[test]
fn test_included_and_placeholder_filters() {
    let entries = vec![
        entry(Inclusion::Include, "A", ""),
        entry(Inclusion::Placeholder, "B", ""),
        entry(Inclusion::Include, "C", ""),
    ];
    let up = included(&entries);
    assert_eq!(up.len(), 2);
    assert_eq!(up[1].title, "C");
    assert_eq!(placeholders(&entries)[0].title, "B");
}

// Property: decode(encode(entries)) == entries for well-formed records.

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Author),
        Just(Role::Editor),
        Just(Role::Translator),
        Just(Role::Illustrator),
    ]
}

fn contributors_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (1u32..4u32, role_strategy()).prop_map(|(n, role)| {
            let list: Vec<Contributor> = (1..=n)
                .map(|i| Contributor {
                    seqno: i,
                    authority_id: Some(u64::from(i) * 7),
                    authority_name: format!("authority {}", i),
                    role,
                })
                .collect();
            serde_json::to_string(&list).expect("serializable")
        }),
    ]
}

fn entry_strategy() -> impl Strategy<Value = TocEntry> {
    (
        any::<bool>(),
        "[A-Za-z][A-Za-z ]{0,10}[A-Za-z]",
        contributors_strategy(),
        "[a-z_]{1,8}",
        "[a-z]{2}",
        prop_oneof![
            Just(String::new()),
            Just("public_domain".to_string()),
            Just("copyrighted".to_string()),
        ],
    )
        .prop_map(|(inc, title, contributors, genre, language, rights)| TocEntry {
            include: if inc {
                Inclusion::Include
            } else {
                Inclusion::Placeholder
            },
            title,
            contributors,
            genre,
            language,
            rights,
        })
}

proptest! {
    #[test]
    fn prop_round_trip(entries in prop::collection::vec(entry_strategy(), 0..6)) {
        let decoded = decode_toc(&encode_toc(&entries)).unwrap();
        prop_assert_eq!(decoded, entries);
    }
}
