//! Interactive confirmation

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask a yes/no question until a recognizable answer is given
///
/// End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    loop {
        write!(output, "{} [y/n] ", question)?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}

/// Ask on the terminal whether `path` may be replaced
pub fn confirm_overwrite(path: &Path) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    confirm(&format!("{} already exists. Overwrite?", path.display()), &mut input, &mut output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answers: &str) -> (bool, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let confirmed = confirm("Overwrite out.tif?", &mut input, &mut output).unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_and_no() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(!ask("n\n").0);
    }

    #[test]
    fn test_reasks_until_answered() {
        let (confirmed, transcript) = ask("maybe\n\ny\n");
        assert!(confirmed);
        assert_eq!(transcript.matches("[y/n]").count(), 3);
    }

    #[test]
    fn test_end_of_input_declines() {
        assert!(!ask("").0);
    }
}
