use env_logger::{ Builder, Env };
use log::LevelFilter;

/// Installs `env_logger` with `level` as the default filter. Directives in
/// `RUST_LOG` are applied on top, so a global level set there wins.
pub fn init_logger(level: LevelFilter) {
    builder(level, Env::default()).init();
}

fn builder(level: LevelFilter, env: Env) -> Builder {
    let mut builder = Builder::new();
    builder.filter_level(level).parse_env(env);
    builder
}

/* Tests */

#[test]
fn environment_level_overrides_default() {
    std::env::set_var("ANALYTIC_TRACER_TEST_LOG_SET", "debug");
    let logger = builder(LevelFilter::Info, Env::new().filter("ANALYTIC_TRACER_TEST_LOG_SET")).build();

    assert_eq!(logger.filter(), LevelFilter::Debug);
}

#[test]
fn default_level_applies_without_environment() {
    let logger = builder(LevelFilter::Warn, Env::new().filter("ANALYTIC_TRACER_TEST_LOG_UNSET")).build();

    assert_eq!(logger.filter(), LevelFilter::Warn);
}
