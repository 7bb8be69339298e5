//! ANSI-styled terminal output helpers.

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // Respect NO_COLOR env (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("PROSPECTOR_NO_COLOR").is_ok() {
        return false;
    }
    stderr_is_tty()
}

#[cfg(unix)]
fn stderr_is_tty() -> bool {
    unsafe { isatty(2) != 0 }
}

#[cfg(unix)]
extern "C" {
    fn isatty(fd: std::os::raw::c_int) -> std::os::raw::c_int;
}

#[cfg(not(unix))]
fn stderr_is_tty() -> bool {
    false
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Red X symbol.
    pub fn fail_sym(&self) -> &str {
        if self.use_color {
            "\x1b[31m\u{2717}\x1b[0m"
        } else {
            "!!"
        }
    }

    /// Yellow warning symbol.
    pub fn warn_sym(&self) -> &str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
