//! CLI output formatting.

use crate::error::ClimError;

/// Version line, with the commit hash when the build recorded one.
#[must_use]
pub fn version_text() -> String {
    match option_env!("CLIMECON_GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            format!("climecon {} ({hash})", env!("CARGO_PKG_VERSION"))
        }
        _ => format!("climecon {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Help message.
#[must_use]
pub fn help_text() -> String {
    r"climecon - Climate-economic projection engine

USAGE:
    climecon <COMMAND> [OPTIONS]

COMMANDS:
    project                     Extend the temperature trend 30 years and
                                compute risk metrics
    scenarios                   Generate baseline/optimistic/pessimistic series
        --scenario <NAME>       all | baseline | optimistic | pessimistic
                                (default: all)
    sensitivity                 Compute sensitivity coefficients
        --value <N>             Slider value in [0, 100] (required)
    compare                     Compare scenarios year by year
        --csv                   Emit CSV instead of JSON
    report                      Full analysis bundle
        --format <FMT>          json | yaml (default: json)
    help                        Show this help message
    version                     Show version information

OPTIONS:
    -i, --input <FILE>          JSON input ({temperatureData, economicData},
                                or a scenario map for 'compare');
                                built-in data when omitted
    -c, --config <FILE>         YAML engine configuration
    --seed <N>                  Seed for reproducible simulation

ENVIRONMENT:
    CLIMECON_LOG                Log filter (default: info), written to stderr

EXAMPLES:
    climecon project --input history.json --seed 42
    climecon scenarios --scenario pessimistic
    climecon sensitivity --value 75
    climecon report --format yaml --config engine.yaml
"
    .to_string()
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_text());
}

/// Print help message.
pub fn print_help() {
    println!("{}", help_text());
}

/// Print an error to stderr.
pub fn print_error(error: &ClimError) {
    eprintln!("Error: {error}");
}
