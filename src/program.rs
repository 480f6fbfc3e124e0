//! Facts about the running program shown in its header and footer.

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    /// Base name of the program, e.g. `deploy.rs`.
    pub name: String,
    /// Arguments joined with spaces, program name included.
    pub command_line: String,
    pub pid: u32,
    pub pgid: i64,
    pub uid: u32,
    pub user: String,
    pub gid: u32,
    pub group: String,
    pub host_name: String,
    /// `DISPLAY`, empty when unset.
    pub display: String,
}

impl ProgramInfo {
    /// Information about this process, taken from `std::env::args`.
    pub fn current() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let name = args
            .first()
            .map(|a| base_name(a).to_string())
            .unwrap_or_default();
        let (uid, gid) = ids();
        ProgramInfo {
            name,
            command_line: args.join(" "),
            pid: std::process::id(),
            pgid: pgid(),
            uid,
            user: user_name(uid),
            gid,
            group: group_name(gid),
            host_name: host_name(),
            display: std::env::var("DISPLAY").unwrap_or_default(),
        }
    }

    /// The program name as a variable name: `deploy.rs` → `deploy_rs`.
    pub fn var_name(&self) -> String {
        self.name.replace('.', "_")
    }

    /// Name/value pairs listed under "Program parameter values, etc.".
    pub fn header_vars(&self) -> Vec<(String, Value)> {
        let pgm = self.var_name();
        vec![
            ("command_line".to_string(), Value::Str(self.command_line.clone())),
            (format!("{}_pid", pgm), Value::Int(i64::from(self.pid))),
            (format!("{}_pgid", pgm), Value::Int(self.pgid)),
            ("uid".to_string(), Value::Str(format!("{} ({})", self.uid, self.user))),
            ("gid".to_string(), Value::Str(format!("{} ({})", self.gid, self.group))),
            ("host_name".to_string(), Value::Str(self.host_name.clone())),
            ("DISPLAY".to_string(), Value::Str(self.display.clone())),
        ]
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(unix)]
fn ids() -> (u32, u32) {
    // SAFETY: geteuid and getgid cannot fail.
    unsafe { (libc::geteuid(), libc::getgid()) }
}

#[cfg(unix)]
fn pgid() -> i64 {
    // SAFETY: getpgrp cannot fail.
    i64::from(unsafe { libc::getpgrp() })
}

#[cfg(unix)]
fn user_name(uid: u32) -> String {
    // SAFETY: the passwd record is read before any other libc call can
    // overwrite it.
    let name = unsafe {
        let pw = libc::getpwuid(uid);
        if pw.is_null() {
            None
        } else {
            Some(std::ffi::CStr::from_ptr((*pw).pw_name).to_string_lossy().into_owned())
        }
    };
    name.unwrap_or_else(|| if uid == 0 { "root" } else { "?" }.to_string())
}

#[cfg(unix)]
fn group_name(gid: u32) -> String {
    // SAFETY: as for user_name.
    let name = unsafe {
        let gr = libc::getgrgid(gid);
        if gr.is_null() {
            None
        } else {
            Some(std::ffi::CStr::from_ptr((*gr).gr_name).to_string_lossy().into_owned())
        }
    };
    name.unwrap_or_else(|| "?".to_string())
}

#[cfg(unix)]
fn host_name() -> String {
    let mut buf = [0u8; 256];
    // SAFETY: the buffer length passed is the buffer's size.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return String::new();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(not(unix))]
fn ids() -> (u32, u32) {
    (0, 0)
}

#[cfg(not(unix))]
fn pgid() -> i64 {
    i64::from(std::process::id())
}

#[cfg(not(unix))]
fn user_name(_uid: u32) -> String {
    std::env::var("USERNAME").unwrap_or_else(|_| "?".to_string())
}

#[cfg(not(unix))]
fn group_name(_gid: u32) -> String {
    "?".to_string()
}

#[cfg(not(unix))]
fn host_name() -> String {
    std::env::var("COMPUTERNAME").unwrap_or_default()
}

#[cfg(test)]
pub(crate) fn sample() -> ProgramInfo {
    ProgramInfo {
        name: "deploy.rs".to_string(),
        command_line: "deploy.rs --target lab".to_string(),
        pid: 4242,
        pgid: 4200,
        uid: 1000,
        user: "ops".to_string(),
        gid: 100,
        group: "users".to_string(),
        host_name: "bench1".to_string(),
        display: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_name_replaces_dots() {
        assert_eq!(sample().var_name(), "deploy_rs");
    }

    #[test]
    fn header_vars_in_order() {
        let names: Vec<String> = sample().header_vars().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "command_line",
                "deploy_rs_pid",
                "deploy_rs_pgid",
                "uid",
                "gid",
                "host_name",
                "DISPLAY"
            ]
        );
        assert_eq!(sample().header_vars()[3].1, Value::Str("1000 (ops)".to_string()));
    }

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("/usr/local/bin/genprint"), "genprint");
        assert_eq!(base_name("genprint"), "genprint");
    }

    #[test]
    fn current_process_is_described() {
        let info = ProgramInfo::current();
        assert_eq!(info.pid, std::process::id());
        assert!(!info.name.is_empty());
        assert!(info.command_line.contains(&info.name));
    }
}
