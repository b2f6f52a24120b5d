use super::{CliError, GlobalArgs};
use anyhow::Context;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use xasprep_core::common::{PlannerConfig, PlannerConfigError, load_planner_config};
use xasprep_core::domain::XasPrepError;
use xasprep_core::{GasComponent, GasMixture};

pub(super) const LOG_ENV_VAR: &str = "XASPREP_LOG";

#[derive(Debug, Clone)]
pub(super) struct CliContext {
    pub(super) config: PlannerConfig,
    pub(super) json: bool,
}

impl CliContext {
    pub(super) fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.config.display_decimals, value)
    }
}

pub(super) fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn load_context(global: &GlobalArgs) -> Result<CliContext, CliError> {
    let config = match &global.config {
        Some(path) => load_planner_config(path).map_err(config_error)?,
        None => PlannerConfig::default(),
    };
    Ok(CliContext {
        config,
        json: global.json,
    })
}

fn config_error(error: PlannerConfigError) -> CliError {
    let planner_error = match &error {
        PlannerConfigError::Read { .. } => XasPrepError::io_system("IO.CONFIG", error.to_string()),
        PlannerConfigError::Parse { .. } | PlannerConfigError::Invalid { .. } => {
            XasPrepError::input_validation("INPUT.CONFIG", error.to_string())
        }
    };
    CliError::Compute(planner_error)
}

/// Print `value` as JSON, or the text produced by `human`.
pub(super) fn emit<T, F>(context: &CliContext, value: &T, human: F) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if context.json {
        let rendered =
            serde_json::to_string_pretty(value).context("failed to render JSON output")?;
        println!("{}", rendered);
    } else {
        println!("{}", human());
    }
    Ok(())
}

pub(super) fn parse_gas_spec(spec: &str) -> Result<GasComponent, XasPrepError> {
    let (name, fraction) = spec.split_once('=').ok_or_else(|| {
        XasPrepError::input_validation(
            "INPUT.GAS_SPEC",
            format!("expected NAME=FRACTION, got '{spec}'"),
        )
    })?;
    let fraction: f64 = fraction.trim().parse().map_err(|_| {
        XasPrepError::input_validation(
            "INPUT.GAS_SPEC",
            format!("fraction in '{spec}' is not a number"),
        )
    })?;
    Ok(GasComponent::new(name.trim(), fraction))
}

pub(super) fn parse_mixture(specs: &[String]) -> Result<GasMixture, XasPrepError> {
    let components = specs
        .iter()
        .map(|spec| parse_gas_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GasMixture::new(components)?)
}

pub(super) fn render_mixture(context: &CliContext, mixture: &GasMixture) -> String {
    let width = mixture
        .iter()
        .map(|gas| gas.name.chars().count())
        .max()
        .unwrap_or(0);
    mixture
        .iter()
        .map(|gas| {
            format!(
                "{:<width$}  {}",
                gas.name,
                context.format_value(gas.fraction),
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{parse_gas_spec, parse_mixture};

    #[test]
    fn gas_spec_accepts_spaces_around_parts() {
        let gas = parse_gas_spec(" N2 = 0.7 ").expect("spec should parse");
        assert_eq!(gas.name, "N2");
        assert_eq!(gas.fraction, 0.7);
    }

    #[test]
    fn gas_spec_requires_separator_and_number() {
        assert_eq!(
            parse_gas_spec("N2").expect_err("missing separator").code(),
            "INPUT.GAS_SPEC"
        );
        assert_eq!(
            parse_gas_spec("N2=lots").expect_err("not a number").code(),
            "INPUT.GAS_SPEC"
        );
    }

    #[test]
    fn unbalanced_mixture_maps_to_sum_code() {
        let specs = vec!["N2=0.5".to_string(), "He=0.2".to_string()];
        let error = parse_mixture(&specs).expect_err("mixture should be unbalanced");
        assert_eq!(error.code(), "INPUT.GAS_SUM");
    }
}
