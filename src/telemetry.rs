use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_CNTR: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz endpoint",
        &["category"]
    )
    .unwrap();
    pub static ref QUESTION_CHANGES_CNTR: CounterVec = register_counter_vec!(
        "questions_modified_total",
        "Number of created and deleted questions",
        &["action"]
    )
    .unwrap();
}

/// Installs the global subscriber. `LOG_LEVEL` takes an `EnvFilter` directive
/// and defaults to `info`.
pub fn init_tracing() -> anyhow::Result<()> {
    let span_events = std::env::var("INCLUDE_SPAN_EVENTS")
        .is_ok_and(|value| value.eq_ignore_ascii_case("true"));
    let fmt_layer = fmt::layer().with_span_events(if span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    });
    let filter_layer = match EnvFilter::try_from_env("LOG_LEVEL") {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new("info")?,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_error() {
        init_tracing().unwrap();
        assert!(init_tracing().is_err());
    }
}
