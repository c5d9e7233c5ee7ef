//! # Pgn — Move Text and Opening Extraction
//!
//! Helpers for the derived game-archive columns. The embedded PGN is split
//! at the blank-line boundary between the tag section and the movetext,
//! clock annotations are stripped, and move tokens are matched with a
//! permissive pattern covering castling and piece/file/rank/capture
//! syntax. Tokens are then paired two at a time (one white ply, one black
//! ply) joined by `,`; a final unpaired ply is kept as-is.

use std::sync::LazyLock;

use regex::Regex;

static MOVE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+-?O?-?O?\d?x?\w\d?").expect("move token pattern"));

static ECO_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ECO "([\w-]*)""#).expect("eco tag pattern"));

/// Derive the paired move-list string from a full PGN.
///
/// `"1. e4 e5 2. Nf3"` → `"e4e5,Nf3"`. A PGN without a movetext section
/// yields the empty string. An even number of plies leaves a trailing
/// separator, matching the shape downstream consumers already parse.
pub fn extract_moves(pgn: &str) -> String {
    let movetext = match pgn.split("\n\n").nth(1) {
        Some(section) => section,
        None => return String::new(),
    };
    let cleaned = movetext.replace("clk", "");
    let tokens: Vec<&str> = MOVE_TOKEN.find_iter(&cleaned).map(|m| m.as_str()).collect();

    let mut moves = String::new();
    for pair in tokens.chunks(2) {
        match pair {
            [white, black] => {
                moves.push_str(white);
                moves.push_str(black);
                moves.push(',');
            }
            [last] => moves.push_str(last),
            _ => {}
        }
    }
    moves
}

/// Extract the ECO opening code from the PGN tag section, `None` when the
/// tag is absent or malformed.
pub fn extract_opening(pgn: &str) -> Option<String> {
    ECO_TAG.captures(pgn).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PGN: &str = "[Event \"Live Chess\"]\n[ECO \"B01\"]\n\n1. e4 {[%clk 0:02:58]} d5 {[%clk 0:02:57]} 2. exd5 Qxd5 1-0";

    #[test]
    fn pairs_plies_with_separator() {
        assert_eq!(extract_moves("[Event \"x\"]\n\n1. e4 e5 2. Nf3"), "e4e5,Nf3");
    }

    #[test]
    fn even_ply_count_keeps_trailing_separator() {
        assert_eq!(extract_moves("[Event \"x\"]\n\n1. e4 e5 2. Nf3 Nc6"), "e4e5,Nf3Nc6,");
    }

    #[test]
    fn clock_annotations_are_stripped() {
        assert_eq!(extract_moves(PGN), "e4d5,exd5Qxd5,");
    }

    #[test]
    fn castling_is_tokenized() {
        let moves = extract_moves("[Event \"x\"]\n\n1. O-O O-O-O");
        assert!(moves.contains("O-O"));
    }

    #[test]
    fn missing_movetext_yields_empty_string() {
        assert_eq!(extract_moves("no blank line here"), "");
        assert_eq!(extract_moves(""), "");
    }

    #[test]
    fn result_markers_are_not_moves() {
        // "1-0" starts with a digit, so the token pattern skips it
        assert_eq!(extract_moves("[Event \"x\"]\n\n1. e4 e5 1-0"), "e4e5,");
    }

    #[test]
    fn eco_code_is_extracted() {
        assert_eq!(extract_opening(PGN), Some("B01".to_string()));
    }

    #[test]
    fn eco_with_hyphen_variant() {
        assert_eq!(
            extract_opening("[ECO \"A45-1\"]\n\n1. d4"),
            Some("A45-1".to_string())
        );
    }

    #[test]
    fn missing_or_malformed_eco_is_none() {
        assert_eq!(extract_opening("[Event \"Live Chess\"]\n\n1. e4"), None);
        assert_eq!(extract_opening("ECO B01 without quotes"), None);
    }
}
