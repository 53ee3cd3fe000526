use super::*;
use clap::Parser;

#[test]
fn serve_defaults_to_all_interfaces_on_port_8000() {
    let cli = Cli::try_parse_from(["hostwatch", "serve"]).expect("parse");
    match cli.command {
        Commands::Serve(WebArgs { host, port }) => {
            assert_eq!(host, "0.0.0.0");
            assert_eq!(port, 8000);
        }
        _ => panic!("expected serve command"),
    }
}

#[test]
fn root_and_config_are_global_options() {
    let cli = Cli::try_parse_from([
        "hostwatch",
        "--root",
        "/srv/monitor",
        "--config",
        "/etc/hostwatch.toml",
        "stats",
    ])
    .expect("parse");
    assert_eq!(cli.root, PathBuf::from("/srv/monitor"));
    assert_eq!(cli.config, Some(PathBuf::from("/etc/hostwatch.toml")));
    assert!(matches!(cli.command, Commands::Stats));
}

#[test]
fn history_limit_is_optional_and_accepts_negative_values() {
    let cli = Cli::try_parse_from(["hostwatch", "history"]).expect("parse");
    match cli.command {
        Commands::History(HistoryArgs { limit }) => assert_eq!(limit, None),
        _ => panic!("expected history command"),
    }

    let cli = Cli::try_parse_from(["hostwatch", "history", "--limit", "-3"]).expect("parse");
    match cli.command {
        Commands::History(HistoryArgs { limit }) => assert_eq!(limit, Some(-3)),
        _ => panic!("expected history command"),
    }
}

#[test]
fn unknown_commands_are_rejected() {
    assert!(Cli::try_parse_from(["hostwatch", "schedule"]).is_err());
}
