use super::*;
use clap::ValueEnum;

#[test]
fn test_default_destination_is_console() {
    assert_eq!(Destination::default(), Destination::Console);
}

#[test]
fn test_destination_from_cli_value() {
    assert_eq!(
        Destination::from_str("console", true).unwrap(),
        Destination::Console
    );
    assert_eq!(
        Destination::from_str("clipboard", true).unwrap(),
        Destination::Clipboard
    );
    assert!(Destination::from_str("printer", true).is_err());
}

#[test]
fn test_console_delivery() {
    let mut sink = OutputSink::new(Destination::Console);
    assert_eq!(sink.destination(), Destination::Console);
    assert!(sink.deliver("hello world").is_ok());
}

// Requires a display server / system clipboard.
#[test]
#[ignore]
fn test_clipboard_delivery() {
    let mut sink = OutputSink::new(Destination::Clipboard);
    assert!(sink.deliver("from micscribe").is_ok());

    let mut clipboard = arboard::Clipboard::new().unwrap();
    assert_eq!(clipboard.get_text().unwrap(), "from micscribe");
}
