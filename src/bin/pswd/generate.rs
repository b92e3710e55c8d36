use std::io::{self, Write};
use std::process::{Command, Stdio};

use anyhow::Context;
use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::{GenerateArgs, ProgError};
use pswd::password_generation;
use pswd::{CharacterClass, GenerationRequest, GenerationResult, Secret, NO_CLASS_SELECTED};

pub(crate) fn generate(args: GenerateArgs) -> Result<(), ProgError> {
    let stdout = io::stdout();
    generate_to(&args, &mut rand::thread_rng(), stdout.lock())
}

/// Generate what `args` asks for and write it to `out`, or to the clipboard for `--copy`.
fn generate_to<R: Rng>(
    args: &GenerateArgs,
    rng: &mut R,
    mut out: impl Write,
) -> Result<(), ProgError> {
    let request = resolve_request(args)?;
    request.validate_ui_range()?;
    debug!(
        "request: length {}, classes {:?}, count {}",
        request.length(),
        request.classes(),
        args.count
    );

    let mut passwords = Vec::with_capacity(usize::from(args.count));
    for _ in 0..args.count {
        match password_generation::generate_password(&mut *rng, &request)? {
            GenerationResult::Password(secret) => passwords.push(secret),
            GenerationResult::NoClassSelected => return show_no_class_selected(args.json, out),
        }
    }

    if args.copy {
        if passwords.len() != 1 {
            return Err(ProgError::CopyNeedsSinglePassword(args.count));
        }
        send_to_clipboard(passwords[0].as_str().as_bytes())
            .context("failed to copy the password to the clipboard")?;
        eprintln!("Copied.");
        return Ok(());
    }

    if args.json {
        serde_json::to_writer(&mut out, &JsonOutput::Passwords { passwords: &passwords })
            .context("failed to write JSON output")?;
        writeln!(out).context("failed to write output")?;
    } else if passwords.len() == 1 {
        writeln!(out, "{}", passwords[0].as_str()).context("failed to write output")?;
    } else {
        let rows = passwords.iter().enumerate().map(PasswordRow::new).collect::<Vec<_>>();
        crate::table::display_table(&rows, out).context("failed to output table")?;
    }
    Ok(())
}

/// Work out the request from the request file (if any) and the flags. Flags win.
fn resolve_request(args: &GenerateArgs) -> Result<GenerationRequest, ProgError> {
    let mut request = match args.request.as_deref() {
        Some(path) => GenerationRequest::load(path).map_err(|err| {
            anyhow::Error::new(err).context(format!(
                "failed to load the request file {}",
                path.display()
            ))
        })?,
        None => GenerationRequest::default(),
    };

    if let Some(length) = args.length {
        request = request.with_length(usize::from(length));
    }

    let flagged = [
        (args.alpha, CharacterClass::Alphabetic),
        (args.numeric, CharacterClass::Numeric),
        (args.symbols, CharacterClass::Symbolic),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, class)| class)
    .collect::<Vec<_>>();
    if !flagged.is_empty() {
        request = request.with_classes(flagged);
    }

    Ok(request)
}

fn show_no_class_selected(json: bool, mut out: impl Write) -> Result<(), ProgError> {
    if json {
        let placeholder = JsonOutput::NoClassSelected {
            message: NO_CLASS_SELECTED,
        };
        serde_json::to_writer(&mut out, &placeholder).context("failed to write JSON output")?;
        writeln!(out).context("failed to write output")?;
    } else {
        writeln!(out, "{}", console::style(NO_CLASS_SELECTED).yellow())
            .context("failed to write output")?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonOutput<'a> {
    Passwords { passwords: &'a [Secret] },
    NoClassSelected { message: &'static str },
}

/// One line of the table printed for `--count` greater than one.
struct PasswordRow {
    cells: [String; 5],
}

impl PasswordRow {
    fn new((idx, secret): (usize, &Secret)) -> PasswordRow {
        let count = |class: CharacterClass| {
            secret
                .as_str()
                .chars()
                .filter(|&ch| class.contains(ch))
                .count()
                .to_string()
        };
        PasswordRow {
            cells: [
                (idx + 1).to_string(),
                secret.as_str().to_owned(),
                count(CharacterClass::Alphabetic),
                count(CharacterClass::Numeric),
                count(CharacterClass::Symbolic),
            ],
        }
    }
}

impl crate::table::TableDisplay for PasswordRow {
    fn columns() -> usize {
        5
    }

    fn column_name(column_index: usize) -> &'static str {
        match column_index {
            0 => "#",
            1 => "Password",
            2 => CharacterClass::Alphabetic.label(),
            3 => CharacterClass::Numeric.label(),
            4 => CharacterClass::Symbolic.label(),
            _ => panic!(),
        }
    }

    fn item(&self, column_index: usize) -> &str {
        &self.cells[column_index]
    }
}

pub(crate) fn send_to_clipboard(data: &[u8]) -> anyhow::Result<()> {
    let mut child = clipboard_cmd()
        .stdin(Stdio::piped())
        .spawn()
        .context("failed to start the clipboard command")?;
    child
        .stdin
        .as_mut()
        .ok_or_else(|| anyhow::anyhow!("the clipboard command has no stdin"))?
        .write_all(data)?;
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("the clipboard command exited with {}", status))
    }
}

#[cfg(target_os = "macos")]
fn clipboard_cmd() -> Command {
    Command::new("pbcopy")
}

#[cfg(not(target_os = "macos"))]
fn clipboard_cmd() -> Command {
    let mut cmd = Command::new("xsel");
    cmd.arg("-b");
    cmd
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::table::TableDisplay;

    fn request_file(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", yaml).unwrap();
        file
    }

    fn output_of(args: &GenerateArgs) -> String {
        let mut out = Vec::new();
        generate_to(args, &mut StdRng::seed_from_u64(11), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn args() -> GenerateArgs {
        GenerateArgs {
            length: None,
            alpha: false,
            numeric: false,
            symbols: false,
            count: 1,
            copy: false,
            json: false,
            request: None,
        }
    }

    #[test]
    fn no_flags_means_the_default_request() {
        assert_eq!(resolve_request(&args()).unwrap(), GenerationRequest::default());
    }

    #[test]
    fn flags_pick_the_classes() {
        let args = GenerateArgs {
            length: Some(20),
            numeric: true,
            symbols: true,
            ..args()
        };
        assert_eq!(
            resolve_request(&args).unwrap(),
            GenerationRequest::new(20, [CharacterClass::Numeric, CharacterClass::Symbolic])
        );
    }

    #[test]
    fn flags_override_the_request_file() {
        let file = request_file("length: 30\nclasses: [symbolic]");
        let path = PathBuf::from(file.path());

        let from_file = GenerateArgs {
            request: Some(path.clone()),
            ..args()
        };
        assert_eq!(
            resolve_request(&from_file).unwrap(),
            GenerationRequest::new(30, [CharacterClass::Symbolic])
        );

        let overridden = GenerateArgs {
            request: Some(path),
            length: Some(12),
            alpha: true,
            ..args()
        };
        assert_eq!(
            resolve_request(&overridden).unwrap(),
            GenerationRequest::new(12, [CharacterClass::Alphabetic])
        );
    }

    #[test]
    fn missing_request_file_is_an_error() {
        let args = GenerateArgs {
            request: Some(PathBuf::from("/nonexistent/pswd-request.yaml")),
            ..args()
        };
        assert!(matches!(resolve_request(&args), Err(ProgError::Other(_))));
    }

    #[test]
    fn row_counts_each_class() {
        let secret = Secret::from("ab1!c".to_owned());
        let row = PasswordRow::new((0, &secret));
        assert_eq!(row.item(0), "1");
        assert_eq!(row.item(1), "ab1!c");
        assert_eq!(row.item(2), "3");
        assert_eq!(row.item(3), "1");
        assert_eq!(row.item(4), "1");
    }

    #[test]
    fn json_shapes() {
        let passwords = [Secret::from("abc123".to_owned())];
        assert_eq!(
            serde_json::to_string(&JsonOutput::Passwords { passwords: &passwords }).unwrap(),
            r#"{"passwords":["abc123"]}"#
        );
        assert_eq!(
            serde_json::to_string(&JsonOutput::NoClassSelected { message: NO_CLASS_SELECTED })
                .unwrap(),
            r#"{"message":"Select at least 1 type"}"#
        );
    }

    #[test]
    fn single_password_is_one_line() {
        let output = output_of(&args());
        let line = output.strip_suffix('\n').unwrap();
        assert_eq!(line.len(), 8);
        assert!(line.chars().all(|ch| ch.is_ascii_alphabetic()));
    }

    #[test]
    fn several_passwords_make_a_table() {
        let args = GenerateArgs {
            length: Some(10),
            numeric: true,
            count: 3,
            ..args()
        };
        let output = output_of(&args);
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5, "{}", output);
        assert!(lines[0].starts_with("#  Password"));
        assert!(lines[0].contains("Numbers"));
        assert!(lines[1].starts_with('─'));
        for (idx, line) in lines[2..].iter().enumerate() {
            let mut cells = line.split_whitespace();
            assert_eq!(cells.next(), Some((idx + 1).to_string().as_str()));
            let password = cells.next().unwrap();
            assert_eq!(password.len(), 10);
            assert!(password.chars().all(|ch| ch.is_ascii_digit()));
            assert_eq!(cells.collect::<Vec<_>>(), vec!["0", "10", "0"]);
        }
    }

    #[test]
    fn json_lists_the_passwords() {
        let args = GenerateArgs {
            count: 2,
            json: true,
            ..args()
        };
        let value: serde_json::Value = serde_json::from_str(&output_of(&args)).unwrap();
        let passwords = value["passwords"].as_array().unwrap();
        assert_eq!(passwords.len(), 2);
        assert!(passwords.iter().all(|p| p.as_str().map(str::len) == Some(8)));
    }

    #[test]
    fn json_placeholder_when_the_request_selects_nothing() {
        let file = request_file("classes: []");
        let args = GenerateArgs {
            request: Some(PathBuf::from(file.path())),
            json: true,
            ..args()
        };
        assert_eq!(output_of(&args), "{\"message\":\"Select at least 1 type\"}\n");
    }

    #[test]
    fn plain_placeholder_when_the_request_selects_nothing() {
        let file = request_file("length: 12\nclasses: []");
        let args = GenerateArgs {
            request: Some(PathBuf::from(file.path())),
            count: 4,
            ..args()
        };
        let output = output_of(&args);
        assert!(output.contains(NO_CLASS_SELECTED));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn request_file_length_must_fit_the_slider_range() {
        let file = request_file("length: 100\nclasses: [numeric]");
        let args = GenerateArgs {
            request: Some(PathBuf::from(file.path())),
            ..args()
        };
        let result = generate_to(&args, &mut StdRng::seed_from_u64(1), Vec::new());
        assert!(matches!(result, Err(ProgError::Request(_))));
    }

    #[test]
    fn copy_refuses_several_passwords() {
        let args = GenerateArgs {
            count: 2,
            copy: true,
            ..args()
        };
        let mut out = Vec::new();
        let result = generate_to(&args, &mut StdRng::seed_from_u64(1), &mut out);
        assert!(matches!(result, Err(ProgError::CopyNeedsSinglePassword(2))));
        assert!(out.is_empty());
    }
}
