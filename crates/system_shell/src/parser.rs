//! Command-line tokenizer: whitespace splitting with quoting and escapes.

use system_shell_contract::ShellError;

/// Splits `line` into argv tokens.
///
/// Whitespace separates tokens. Single or double quotes group text (including whitespace) into
/// one token, and `\` escapes the next character both inside and outside quotes.
///
/// # Errors
///
/// Returns a usage error for an unterminated quote or a trailing escape.
pub fn tokenize_line(line: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();
    let mut quote = None::<char>;

    while let Some(ch) = chars.next() {
        match quote {
            Some(active) if ch == active => quote = None,
            Some(_) if ch == '\\' => current.push(escaped(&mut chars)?),
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None if ch == '\\' => {
                current.push(escaped(&mut chars)?);
                in_token = true;
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShellError::usage("unterminated quoted string"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn escaped(chars: &mut std::str::Chars<'_>) -> Result<char, ShellError> {
    chars
        .next()
        .ok_or_else(|| ShellError::usage("dangling escape sequence"))
}
