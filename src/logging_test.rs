use super::*;

#[test]
fn parse_level_falls_back_to_info() {
    assert_eq!(parse_level("DEBUG"), Level::DEBUG);
    assert_eq!(parse_level("warning"), Level::WARN);
    assert_eq!(parse_level("verbose"), Level::INFO);
}
