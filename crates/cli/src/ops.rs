use page_model::{EditAction, PageId};
use std::fmt;
use std::str::FromStr;

/// One `--op` argument. `move=SRC:DST` is replayed as a drag of SRC dropped
/// on DST (`DST` may be `end`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    text: String,
    actions: Vec<EditAction>,
}

impl EditOp {
    pub fn actions(&self) -> &[EditAction] {
        &self.actions
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| format!("invalid op `{text}`: {reason}");
        let page = |value: &str| parse_page(value).map_err(|reason| invalid(&reason));
        let (verb, argument) = text.split_once('=').unwrap_or((text, ""));

        let actions = match verb {
            "rotate" => {
                let (identity, delta) =
                    argument.split_once(':').ok_or_else(|| invalid("expected ID:DEGREES"))?;
                let delta = delta.parse().map_err(|_| invalid("degrees must be an integer"))?;
                vec![EditAction::Rotate { identity: page(identity)?, delta }]
            }
            "delete" => vec![EditAction::Delete { identity: page(argument)? }],
            "select" => vec![EditAction::ToggleSelect { identity: page(argument)? }],
            "clear-selection" => vec![EditAction::ClearSelection],
            "move" => {
                let (source, target) =
                    argument.split_once(':').ok_or_else(|| invalid("expected SRC:DST"))?;
                let drop = if target == "end" {
                    EditAction::DropAtEnd
                } else {
                    EditAction::Drop { identity: page(target)? }
                };
                vec![EditAction::BeginDrag { identity: page(source)? }, drop]
            }
            other => return Err(invalid(&format!("unknown action `{other}`"))),
        };

        Ok(Self { text: text.to_owned(), actions })
    }
}

fn parse_page(value: &str) -> Result<PageId, String> {
    match value.parse::<u32>() {
        Ok(number) if number > 0 => Ok(PageId(number)),
        _ => Err(format!("`{value}` is not a 1-based page number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<EditAction> {
        text.parse::<EditOp>().expect("op should parse").actions().to_vec()
    }

    #[test]
    fn parses_rotate_with_negative_delta() {
        assert_eq!(
            parse("rotate=3:-90"),
            vec![EditAction::Rotate { identity: PageId(3), delta: -90 }]
        );
    }

    #[test]
    fn parses_selection_ops() {
        assert_eq!(parse("select=4"), vec![EditAction::ToggleSelect { identity: PageId(4) }]);
        assert_eq!(parse("clear-selection"), vec![EditAction::ClearSelection]);
        assert_eq!(parse("delete=2"), vec![EditAction::Delete { identity: PageId(2) }]);
    }

    #[test]
    fn move_expands_to_drag_and_drop() {
        assert_eq!(
            parse("move=5:1"),
            vec![
                EditAction::BeginDrag { identity: PageId(5) },
                EditAction::Drop { identity: PageId(1) },
            ]
        );
        assert_eq!(
            parse("move=1:end"),
            vec![EditAction::BeginDrag { identity: PageId(1) }, EditAction::DropAtEnd]
        );
    }

    #[test]
    fn rejects_malformed_ops() {
        for text in ["rotate=3", "rotate=x:90", "delete=0", "delete=-1", "flip=2", "move=1"] {
            let err = text.parse::<EditOp>().expect_err("op should be rejected");
            assert!(err.starts_with("invalid op"), "unexpected message: {err}");
        }
    }

    #[test]
    fn display_keeps_original_text() {
        let op: EditOp = "rotate=1:90".parse().expect("op should parse");
        assert_eq!(op.to_string(), "rotate=1:90");
    }
}
