//! Builder lookup for resolved programs.
//!
//! Program names are normalized (directory and `.exe` stripped, lowercased)
//! and passed through a short alias table before the builder is looked up.
//! The returned [`Dispatched`] handle refuses passwords for builders that
//! cannot take one.

use crate::programs::{self, ArchiveProgram, Job};
use crate::resolve::Program;
use once_cell::sync::Lazy;
use oxiwrap_core::{Command, CommandLine, Format, Result, WrapError};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Strip the directory and platform executable suffix, then lowercase.
pub fn normalize(executable: &str) -> String {
    let name = Path::new(executable)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| executable.to_string())
        .to_ascii_lowercase();
    match name.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Map a normalized program name to the builder that handles it.
pub fn builder_id(normalized: &str) -> &str {
    match normalized {
        "7z" | "7za" | "7zz" | "7zzs" => "p7zip",
        "uncompress.real" => "uncompress",
        "dpkg-deb" => "dpkg",
        other => other,
    }
}

static BUILDERS: Lazy<HashMap<&'static str, &'static dyn ArchiveProgram>> = Lazy::new(|| {
    programs::all()
        .into_iter()
        .flat_map(|program| program.ids().iter().map(move |id| (*id, program)))
        .collect()
});

/// A builder bound to one (program, command, format) triple.
pub struct Dispatched {
    builder: &'static dyn ArchiveProgram,
    id: String,
    command: Command,
    format: Format,
}

impl std::fmt::Debug for Dispatched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatched")
            .field("id", &self.id)
            .field("command", &self.command)
            .field("format", &self.format)
            .finish()
    }
}

/// Find the builder for a resolved program.
pub fn lookup(program: &Program, command: Command, format: Format) -> Result<Dispatched> {
    let id = program.id();
    let builder = BUILDERS
        .get(builder_id(&id))
        .copied()
        .filter(|builder| builder.supports(command, format))
        .ok_or_else(|| WrapError::NoBuilder {
            program: id.clone(),
            command,
            format,
        })?;
    debug!(program = %id, %command, %format, "builder found");
    Ok(Dispatched {
        builder,
        id,
        command,
        format,
    })
}

impl Dispatched {
    /// The normalized program identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the builder takes a password for this command and format.
    pub fn accepts_password(&self) -> bool {
        self.builder.accepts_password(self.command, self.format)
    }

    /// Build the invocation, rejecting a password the builder cannot use.
    pub fn build(&self, job: &Job<'_>) -> Result<Option<CommandLine>> {
        if job.password.is_some() && !self.accepts_password() {
            return Err(WrapError::NoPasswordSupport {
                program: self.id.clone(),
                command: self.command,
                format: self.format,
            });
        }
        self.builder.build(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Installed;
    use crate::programs::Operation;
    use crate::registry::{all_programs, capabilities, is_builtin};
    use crate::resolve::Executable;
    use std::path::PathBuf;

    fn external(name: &str) -> Program {
        Program {
            name: name.to_string(),
            executable: Executable::Path(PathBuf::from("/usr/bin").join(name)),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/usr/bin/7z"), "7z");
        assert_eq!(normalize("Tar.exe"), "tar");
        assert_eq!(normalize("uncompress.real"), "uncompress.real");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(builder_id("7zzs"), "p7zip");
        assert_eq!(builder_id("dpkg-deb"), "dpkg");
        assert_eq!(builder_id("uncompress.real"), "uncompress");
        assert_eq!(builder_id("gzip"), "gzip");
    }

    #[test]
    fn test_every_registry_entry_has_a_builder() {
        for format in Format::ALL {
            for (bucket, names) in capabilities(format) {
                let commands: Vec<Command> = match bucket {
                    Some(command) => vec![*command],
                    None => Command::ALL.to_vec(),
                };
                for command in commands {
                    for name in names.iter() {
                        let program = if is_builtin(name) {
                            Program {
                                name: name.to_string(),
                                executable: Executable::Builtin,
                            }
                        } else {
                            external(name)
                        };
                        assert!(
                            lookup(&program, command, format).is_ok(),
                            "no builder for {name} {command} {format}"
                        );
                    }
                }
            }
        }
        assert!(all_programs().iter().all(|name| {
            BUILDERS.contains_key(builder_id(&normalize(name)))
        }));
    }

    #[test]
    fn test_unsupported_pair_is_a_dispatch_error() {
        let err = lookup(&external("unzip"), Command::Create, Format::Zip).unwrap_err();
        assert!(matches!(err, WrapError::NoBuilder { .. }));
        let err = lookup(&external("mystery"), Command::List, Format::Zip).unwrap_err();
        assert!(matches!(err, WrapError::NoBuilder { .. }));
    }

    #[test]
    fn test_password_gate() {
        let finder = Installed::new(&[]);
        let dispatched = lookup(&external("gzip"), Command::Test, Format::Gzip).unwrap();
        let job = Job {
            archive: std::path::Path::new("/data/a.gz"),
            format: Format::Gzip,
            compression: None,
            executable: "/usr/bin/gzip",
            operation: Operation::Test,
            verbosity: 0,
            interactive: true,
            password: Some("secret"),
            finder: &*finder,
        };
        assert!(matches!(
            dispatched.build(&job),
            Err(WrapError::NoPasswordSupport { .. })
        ));

        let dispatched = lookup(&external("7z"), Command::Test, Format::SevenZip).unwrap();
        let job = Job {
            format: Format::SevenZip,
            executable: "/usr/bin/7z",
            ..job
        };
        let cmd = dispatched.build(&job).unwrap().unwrap();
        assert!(cmd.contains("-psecret"));
    }
}
