//! Plain-terminal rendering of coach replies.

use services::{Keyboard, Reply};

/// Drops the Telegram markdown markers (`*bold*`, `` `code` ``).
#[must_use]
pub fn plain_text(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '`')).collect()
}

fn keyboard_lines(keyboard: Keyboard) -> Vec<String> {
    keyboard
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|label| format!("[ {label} ]"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Messages separated by blank lines, then the buttons, one row per line.
#[must_use]
pub fn render(reply: &Reply) -> String {
    let mut out: Vec<String> = reply.messages.iter().map(|m| plain_text(m)).collect();
    let buttons = keyboard_lines(reply.keyboard);
    if !buttons.is_empty() {
        out.push(buttons.join("\n"));
    }
    out.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup() {
        assert_eq!(plain_text("*Вопрос 1/10:*\n`D1`"), "Вопрос 1/10:\nD1");
    }

    #[test]
    fn menu_lists_buttons() {
        let rendered = render(&Reply::menu("*Привет*"));
        assert!(rendered.starts_with("Привет\n\n[ "));
        assert!(rendered.contains("[ 📝 Тест (10 вопросов) ]"));
    }

    #[test]
    fn test_reply_has_no_buttons() {
        let rendered = render(&Reply::test("`A8`"));
        assert_eq!(rendered, "A8");
    }
}
