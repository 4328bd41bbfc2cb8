use std::path::PathBuf;

use myarch_format::{Compression, Protection};
use structopt::clap::AppSettings::*;
use structopt::StructOpt;

#[derive(Debug)]
pub struct ParseSchemeError {
    kind: &'static str,
    value: String,
    expected: &'static [&'static str],
}

impl std::error::Error for ParseSchemeError {}

impl std::fmt::Display for ParseSchemeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown {} method: {} (expected one of: {})",
            self.kind,
            self.value,
            self.expected.join(", ")
        )
    }
}

fn parse_compression(src: &str) -> Result<Compression, ParseSchemeError> {
    let compression = match src {
        "stored" | "none" => Compression::Stored,
        "deflate" | "zlib" => Compression::Deflate,
        "rle" | "run-length" => Compression::RunLength,
        _ => {
            return Err(ParseSchemeError {
                kind: "compression",
                value: src.to_string(),
                expected: Compression::available_variants(),
            })
        }
    };

    Ok(compression)
}

fn parse_protection(src: &str) -> Result<Protection, ParseSchemeError> {
    let protection = match src {
        "none" => Protection::None,
        "crc32" | "crc" => Protection::Crc32,
        _ => {
            return Err(ParseSchemeError {
                kind: "protection",
                value: src.to_string(),
                expected: Protection::available_variants(),
            })
        }
    };

    Ok(protection)
}

#[derive(Debug, StructOpt)]
pub enum Commands {
    #[structopt(name = "c", visible_alias = "create", about = "Create a new archive")]
    Create(CreateArgs),

    #[structopt(
        name = "x",
        visible_alias = "extract",
        about = "Extract files from an archive"
    )]
    Extract(ExtractArgs),

    #[structopt(name = "l", visible_alias = "list", about = "List files of an archive")]
    List(ArchiveArgs),

    #[structopt(
        name = "t",
        visible_alias = "validate",
        about = "Decode and verify every file without writing anything"
    )]
    Validate(ArchiveArgs),

    #[structopt(name = "i", visible_alias = "info", about = "Show archive header fields")]
    Info(ArchiveArgs),
}

#[derive(Debug, StructOpt)]
pub struct CreateArgs {
    #[structopt(
        short = "C",
        long,
        parse(try_from_str = parse_compression),
        default_value = "stored",
        help = "Compression applied to every file: stored, deflate or rle"
    )]
    pub compression: Compression,

    #[structopt(
        short = "P",
        long,
        parse(try_from_str = parse_protection),
        default_value = "crc32",
        help = "Integrity protection: none or crc32"
    )]
    pub protection: Protection,

    #[structopt(
        short = "L",
        long,
        default_value = "6",
        help = "DEFLATE compression level [0-9]"
    )]
    pub level: u32,

    #[structopt(short, long, help = "Overwrite an existing archive")]
    pub force: bool,

    #[structopt(
        name = "archive",
        parse(from_os_str),
        help = "Path of the archive to create"
    )]
    pub archive: PathBuf,

    #[structopt(
        name = "path",
        parse(from_os_str),
        help = "Directory or single file to archive"
    )]
    pub path: PathBuf,
}

#[derive(Debug, StructOpt)]
pub struct ExtractArgs {
    #[structopt(
        short,
        long,
        parse(from_os_str),
        help = "Output directory [default: current directory]"
    )]
    pub output: Option<PathBuf>,

    #[structopt(long, help = "Skip checksum verification")]
    pub no_verify: bool,

    #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
    pub archive: PathBuf,
}

#[derive(Debug, StructOpt)]
pub struct ArchiveArgs {
    #[structopt(name = "archive", parse(from_os_str), help = "Path to the archive")]
    pub archive: PathBuf,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "myarch",
    about = "Create, list, validate and extract myarch archives.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
)]
pub struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub cmd: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_names() {
        assert_eq!(parse_compression("rle").unwrap(), Compression::RunLength);
        assert_eq!(parse_compression("deflate").unwrap(), Compression::Deflate);
        assert_eq!(parse_protection("none").unwrap(), Protection::None);
        let err = parse_compression("zstd").unwrap_err();
        assert!(err.to_string().contains("stored, deflate, rle"));
    }

    #[test]
    fn create_defaults() {
        let opts = CliOpts::from_iter(&["myarch", "c", "out.myarch", "src"]);
        match opts.cmd {
            Commands::Create(args) => {
                assert_eq!(args.compression, Compression::Stored);
                assert_eq!(args.protection, Protection::Crc32);
                assert_eq!(args.level, 6);
                assert!(!args.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn aliases_and_global_verbose() {
        let opts = CliOpts::from_iter(&["myarch", "extract", "-v", "--no-verify", "a.myarch"]);
        assert!(opts.verbose);
        assert!(matches!(opts.cmd, Commands::Extract(ExtractArgs { no_verify: true, .. })));

        let opts = CliOpts::from_iter(&["myarch", "validate", "a.myarch"]);
        assert!(matches!(opts.cmd, Commands::Validate(_)));
    }
}
