use clap::{
    Arg, ArgAction, ArgGroup, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("dsn")
                .env("PGPROBE_DSN")
                .hide_env_values(true)
                .help("postgresql://<username>:<password>@<host>[:<port>]/<database>")
                .long("dsn")
                .short('d')
                .value_name("URL"),
        )
        .arg(
            Arg::new("dsn-file")
                .env("PGPROBE_DSN_FILE")
                .help("Read the connection URL from a file")
                .long("dsn-file")
                .long_help(
                    "Read the connection URL from a file, e.g. a mounted secret.\n\
                    The first non-empty line is used.\n\n\
                    Example: /run/secrets/database_url"
                )
                .value_name("PATH"),
        )
        .group(
            ArgGroup::new("target")
                .args(["dsn", "dsn-file"])
                .required(true)
                .multiple(false),
        )
        .arg(
            Arg::new("tls-mode")
                .default_value("require")
                .env("PGPROBE_TLS_MODE")
                .help("TLS/SSL mode: disable, require, verify-ca, verify-full")
                .long("tls-mode")
                .long_help(
                    "TLS/SSL connection mode, enforced regardless of any sslmode in the URL:\n\n\
                    - disable: No TLS\n\
                    - require: TLS required, no certificate verification (default)\n\
                    - verify-ca: Verify server certificate against CA\n\
                    - verify-full: Verify certificate and hostname\n\n\
                    There is no fallback: if the server refuses TLS the probe fails."
                )
                .value_name("MODE")
                .value_parser(["disable", "require", "verify-ca", "verify-full"]),
        )
        .arg(
            Arg::new("tls-ca")
                .env("PGPROBE_TLS_CA")
                .help("Path to CA certificate file for TLS verification")
                .long("tls-ca")
                .long_help(
                    "Path to Certificate Authority (CA) certificate file.\n\
                    Used by the verify-ca and verify-full modes.\n\n\
                    Example: /etc/ssl/certs/ca-certificates.crt"
                )
                .value_name("PATH"),
        )
        .arg(
            Arg::new("tls-cert")
                .env("PGPROBE_TLS_CERT")
                .help("Path to client certificate file for TLS client authentication")
                .long("tls-cert")
                .value_name("PATH")
                .requires("tls-key"),
        )
        .arg(
            Arg::new("tls-key")
                .env("PGPROBE_TLS_KEY")
                .help("Path to client private key file for TLS client authentication")
                .long("tls-key")
                .value_name("PATH")
                .requires("tls-cert"),
        )
        .arg(
            Arg::new("label")
                .env("PGPROBE_LABEL")
                .help("Name of the database used in messages, e.g. \"reai.io\"")
                .long("label")
                .short('l')
                .value_name("NAME"),
        )
        .arg(
            Arg::new("format")
                .default_value("text")
                .env("PGPROBE_FORMAT")
                .help("Output format")
                .long("format")
                .short('f')
                .value_parser(["text", "json"]),
        )
        .arg(
            Arg::new("exit-code")
                .env("PGPROBE_EXIT_CODE")
                .help("Exit with status 1 when the probe fails (default: always 0)")
                .long("exit-code")
                .action(ArgAction::SetTrue),
        )
}
