use tastelist::utils::*;

#[test]
fn test_generate_session_id() {
    let id = generate_session_id();

    // Should be exactly 48 characters
    assert_eq!(id.len(), 48);

    // Should contain only alphanumeric characters
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated ids should be different
    assert_ne!(id, generate_session_id());
}

#[test]
fn test_generate_state_is_unpadded() {
    let state = generate_state();

    // 24 bytes in unpadded base64
    assert_eq!(state.len(), 32);
    assert!(!state.contains('='));
}

#[test]
fn test_remove_duplicate_uris() {
    let mut uris = vec![
        "spotify:track:c".to_string(),
        "spotify:track:a".to_string(),
        "spotify:track:c".to_string(),
        "spotify:track:b".to_string(),
        "spotify:track:a".to_string(),
    ];

    remove_duplicate_uris(&mut uris);

    // First occurrence wins and the order is kept
    assert_eq!(
        uris,
        vec![
            "spotify:track:c".to_string(),
            "spotify:track:a".to_string(),
            "spotify:track:b".to_string(),
        ]
    );
}

#[test]
fn test_remove_duplicate_uris_empty() {
    let mut uris: Vec<String> = Vec::new();
    remove_duplicate_uris(&mut uris);
    assert!(uris.is_empty());
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html("<b>Tom & \"Jerry\"</b>"),
        "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
    );
    assert_eq!(escape_html("it's"), "it&#x27;s");

    // Plain text passes through untouched
    assert_eq!(escape_html("Björk"), "Björk");
}

#[test]
fn test_now_epoch_is_recent() {
    // 2023-11-14, well before any run of this test
    assert!(now_epoch() > 1_700_000_000);
}
