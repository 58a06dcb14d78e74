//! Shell command emission.
//!
//! The tool cannot change the environment of the shell that started it, so
//! every effect on that shell is expressed as a line of shell text which the
//! shell evaluates afterwards (`eval "$(swork start proj)"`). A [`Script`] keeps
//! those lines in the exact order they have to run.

use std::{
    ffi::OsStr,
    io::{self, Write},
    os::unix::ffi::OsStrExt,
    path::Path,
};

use super::EnvSnapshot;

/// An ordered sequence of shell command lines.
///
/// Lines are raw bytes because exported values may hold bytes that are not
/// valid UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script(Vec<Vec<u8>>);

impl Script {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command verbatim.
    pub fn push_raw(&mut self, command: impl AsRef<[u8]>) {
        self.0.push(command.as_ref().to_vec());
    }

    /// Append `cd <dir>`.
    pub fn push_cd(&mut self, dir: &Path) {
        self.push_words(b"cd", dir.as_os_str());
    }

    /// Append `echo <text>`.
    pub fn push_echo(&mut self, text: impl AsRef<OsStr>) {
        self.push_words(b"echo", text.as_ref());
    }

    /// Append `export <name>=<value>`.
    pub fn push_export(&mut self, name: &OsStr, value: &OsStr) {
        let mut line = b"export ".to_vec();
        line.extend_from_slice(name.as_bytes());
        line.push(b'=');
        line.extend_from_slice(&quote(value.as_bytes()));
        self.0.push(line);
    }

    /// Append `unset <name>`.
    pub fn push_unset(&mut self, name: &OsStr) {
        let mut line = b"unset ".to_vec();
        line.extend_from_slice(name.as_bytes());
        self.0.push(line);
    }

    fn push_words(&mut self, command: &[u8], argument: &OsStr) {
        let mut line = command.to_vec();
        line.push(b' ');
        line.extend_from_slice(&quote(argument.as_bytes()));
        self.0.push(line);
    }

    /// Append every line of `other`, keeping its order.
    pub fn append(&mut self, other: Script) {
        self.0.extend(other.0);
    }

    /// Iterate over the lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.0.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write every line followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying writer.
    pub fn write_to(&self, mut out: impl Write) -> io::Result<()> {
        for line in &self.0 {
            out.write_all(line)?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }

    /// The lines decoded lossily as UTF-8, for logging and assertions.
    #[must_use]
    pub fn to_lines_lossy(&self) -> Vec<String> {
        self.lines()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }
}

/// Whether `name` can appear in `export`/`unset` without breaking the shell.
///
/// Environments can carry names such as `BASH_FUNC_foo%%` that are not shell
/// identifiers; those are skipped when rendering.
#[must_use]
pub fn is_valid_name(name: &OsStr) -> bool {
    let bytes = name.as_bytes();
    match bytes.split_first() {
        Some((first, rest)) => {
            (first.is_ascii_alphabetic() || *first == b'_')
                && rest.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
        }
        None => false,
    }
}

/// Quote `value` for a POSIX shell.
///
/// Values made only of characters the shell never reinterprets are returned
/// as-is; everything else is single-quoted, with embedded `'` written as `'\''`.
/// NUL bytes cannot be represented in a shell word.
#[must_use]
pub fn quote(value: &[u8]) -> Vec<u8> {
    let is_plain = |b: &u8| b.is_ascii_alphanumeric() || b"_-./:,+=@%".contains(b);
    if !value.is_empty() && value.iter().all(is_plain) {
        return value.to_vec();
    }

    let mut quoted = Vec::with_capacity(value.len() + 2);
    quoted.push(b'\'');
    for &b in value {
        if b == b'\'' {
            quoted.extend_from_slice(b"'\\''");
        } else {
            quoted.push(b);
        }
    }
    quoted.push(b'\'');
    quoted
}

/// Render the commands that turn the invoking shell's environment into `target`.
///
/// Every variable currently set is unset first, then every variable of
/// `target` is exported. Names that are not shell identifiers are skipped on
/// both sides.
pub fn render_activation_script<'a>(
    current_names: impl IntoIterator<Item = &'a OsStr>,
    target: &EnvSnapshot,
) -> Script {
    let mut script = Script::new();

    for name in current_names {
        if is_valid_name(name) {
            script.push_unset(name);
        } else {
            tracing::debug!(name = %name.to_string_lossy(), "not unsetting non-identifier variable");
        }
    }

    for (name, value) in target.iter() {
        if is_valid_name(name) {
            script.push_export(name, value);
        } else {
            tracing::debug!(name = %name.to_string_lossy(), "not exporting non-identifier variable");
        }
    }

    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_values_untouched() {
        assert_eq!(quote(b"/home/u"), b"/home/u");
        assert_eq!(quote(b"en_US.UTF-8"), b"en_US.UTF-8");
        assert_eq!(quote(b"/usr/bin:/bin"), b"/usr/bin:/bin");
    }

    #[test]
    fn test_quote_special_values() {
        assert_eq!(quote(b""), b"''");
        assert_eq!(quote(b"a b"), b"'a b'");
        assert_eq!(quote(b"$HOME"), b"'$HOME'");
        assert_eq!(quote(b"it's"), b"'it'\\''s'");
        assert_eq!(quote(b"two\nlines"), b"'two\nlines'");
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name(OsStr::new("HOME")));
        assert!(is_valid_name(OsStr::new("_private")));
        assert!(is_valid_name(OsStr::new("PATH2")));
        assert!(!is_valid_name(OsStr::new("")));
        assert!(!is_valid_name(OsStr::new("2PATH")));
        assert!(!is_valid_name(OsStr::new("BASH_FUNC_foo%%")));
        assert!(!is_valid_name(OsStr::new("A-B")));
    }

    #[test]
    fn test_render_unsets_then_exports() {
        let target: EnvSnapshot = [("HOME", "/home/u"), ("EDITOR", "vim -p")]
            .into_iter()
            .collect();
        let current = [OsStr::new("HOME"), OsStr::new("VIRTUAL_ENV")];

        let script = render_activation_script(current, &target);

        assert_eq!(
            script.to_lines_lossy(),
            [
                "unset HOME",
                "unset VIRTUAL_ENV",
                "export EDITOR='vim -p'",
                "export HOME=/home/u",
            ]
        );
    }

    #[test]
    fn test_render_skips_non_identifiers() {
        let target: EnvSnapshot = [("BASH_FUNC_x%%", "() { :; }"), ("OK", "1")]
            .into_iter()
            .collect();
        let current = [OsStr::new("BASH_FUNC_y%%")];

        let script = render_activation_script(current, &target);

        assert_eq!(script.to_lines_lossy(), ["export OK=1"]);
    }

    #[test]
    fn test_write_to_terminates_each_line() {
        let mut script = Script::new();
        script.push_cd(Path::new("/r"));
        script.push_raw("source /r/env.sh");

        let mut out = Vec::new();
        script.write_to(&mut out).unwrap();

        assert_eq!(out, b"cd /r\nsource /r/env.sh\n");
    }

    #[test]
    fn test_append_keeps_order() {
        let mut first = Script::new();
        first.push_raw("one");
        let mut second = Script::new();
        second.push_raw("two");
        second.push_echo("three four");

        first.append(second);

        assert_eq!(first.to_lines_lossy(), ["one", "two", "echo 'three four'"]);
    }

    #[test]
    fn test_exports_survive_real_shells() {
        use std::process::Command;
        use tempfile::TempDir;

        let values: [&[u8]; 9] = [
            b"",
            b"plain",
            b"it's \"quoted\"",
            b"$HOME and ${PATH}",
            b"`id` $(id)",
            b"two\nlines\n",
            b"back\\slash\ttab !bang",
            b"*?[glob] ~tilde",
            &[0xff, 0xfe, b'a', 0x80],
        ];

        for shell in ["sh", "bash", "zsh"] {
            let installed = Command::new(shell)
                .args(["-c", "true"])
                .status()
                .is_ok_and(|status| status.success());
            if !installed {
                continue;
            }

            let tmp = TempDir::new().unwrap();
            let mut script = Script::new();
            for (i, value) in values.iter().enumerate() {
                let name = format!("SW_VALUE_{i}");
                script.push_export(OsStr::new(&name), OsStr::from_bytes(value));

                let out = tmp.path().join(i.to_string());
                let mut print = format!("printf '%s' \"${name}\" > ").into_bytes();
                print.extend(quote(out.as_os_str().as_bytes()));
                script.push_raw(print);
            }

            let mut text = Vec::new();
            script.write_to(&mut text).unwrap();

            let status = Command::new(shell)
                .arg("-c")
                .arg(OsStr::from_bytes(&text))
                .status()
                .unwrap();
            assert!(status.success(), "{shell} rejected the script");

            for (i, value) in values.iter().enumerate() {
                let got = std::fs::read(tmp.path().join(i.to_string())).unwrap();
                assert_eq!(got, *value, "{shell} changed value {i}");
            }
        }
    }
}
