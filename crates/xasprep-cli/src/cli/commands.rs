use super::CliError;
use super::helpers::{CliContext, emit, parse_mixture, render_mixture};
use serde::Serialize;
use xasprep_core::domain::XasPrepError;
use xasprep_core::sample::{SuggestedMix, areal_density_g_cm2, suggest_sample_mix};
use xasprep_core::{
    EdgeStepSearchInput, GasMixture, MassMixInput, SuitabilityVerdict, classify_fluorescence,
    classify_transmission, compute_sample_weight_mix, pellet_area_cm2, summarize_suitability,
    validate_scan_range,
};

/// Exit code for a well-formed request with no feasible answer.
const NO_SOLUTION_EXIT_CODE: i32 = 1;

#[derive(clap::Args)]
#[command(group(clap::ArgGroup::new("area").required(true).args(["area_cm2", "diameter_mm"])))]
pub(super) struct SampleGeometryArgs {
    /// Sample edge-step per unit areal density (cm^2/g)
    #[arg(long, allow_negative_numbers = true)]
    sample_edge_step: f64,

    /// Diluent edge-step per unit areal density (cm^2/g)
    #[arg(long, allow_negative_numbers = true)]
    diluent_edge_step: f64,

    /// Total pellet mass in mg
    #[arg(long)]
    total_mass_mg: f64,

    /// Pellet face area in cm^2
    #[arg(long)]
    area_cm2: Option<f64>,

    /// Pellet die diameter in mm (area derived from it)
    #[arg(long)]
    diameter_mm: Option<f64>,
}

impl SampleGeometryArgs {
    fn area_cm2(&self) -> Result<f64, XasPrepError> {
        match (self.area_cm2, self.diameter_mm) {
            (Some(area), _) => Ok(area),
            (None, Some(diameter)) => pellet_area_cm2(diameter).ok_or_else(|| {
                XasPrepError::input_validation(
                    "INPUT.PELLET_DIAMETER",
                    format!("pellet diameter must be finite and > 0, got {diameter}"),
                )
            }),
            (None, None) => Err(XasPrepError::input_validation(
                "INPUT.PELLET_AREA",
                "either --area-cm2 or --diameter-mm is required",
            )),
        }
    }
}

#[derive(clap::Args)]
pub(super) struct MixArgs {
    #[command(flatten)]
    geometry: SampleGeometryArgs,

    /// Edge-step the pellet should show
    #[arg(long)]
    target_edge_step: f64,
}

#[derive(clap::Args)]
pub(super) struct SuggestArgs {
    #[command(flatten)]
    geometry: SampleGeometryArgs,

    /// Sample mass-absorption above the edge (cm^2/g)
    #[arg(long)]
    sample_mu_above: f64,

    /// Diluent mass-absorption above the edge (cm^2/g)
    #[arg(long)]
    diluent_mu_above: f64,

    /// Total absorption to reach (defaults to the config value)
    #[arg(long)]
    target_absorption: Option<f64>,
}

#[derive(clap::Args)]
pub(super) struct ClassifyArgs {
    /// Total absorption mu*t for transmission
    #[arg(long)]
    mu_t: f64,

    /// Fluorescence self-absorption ratio R in percent
    #[arg(long)]
    r_percent: f64,
}

#[derive(clap::Args)]
pub(super) struct GasArgs {
    #[command(subcommand)]
    action: GasAction,
}

#[derive(clap::Subcommand)]
enum GasAction {
    /// Append a gas and shrink the others proportionally
    Add {
        #[command(flatten)]
        mixture: MixtureArgs,
        /// Name of the new gas
        #[arg(long)]
        name: String,
        /// Fraction of the new gas, in [0, 1)
        #[arg(long)]
        fraction: f64,
    },
    /// Remove a gas and scale the others back up to one
    Remove {
        #[command(flatten)]
        mixture: MixtureArgs,
        /// Zero-based position of the gas to remove
        #[arg(long)]
        index: usize,
    },
    /// Set one gas fraction and rescale the others
    Update {
        #[command(flatten)]
        mixture: MixtureArgs,
        /// Zero-based position of the gas to edit
        #[arg(long)]
        index: usize,
        /// New fraction, in [0, 1]
        #[arg(long)]
        fraction: f64,
    },
}

#[derive(clap::Args)]
struct MixtureArgs {
    /// Current mixture component as NAME=FRACTION, repeated in order
    #[arg(long = "gas", value_name = "NAME=FRACTION", required = true)]
    gases: Vec<String>,
}

#[derive(clap::Args)]
pub(super) struct RangeArgs {
    /// First energy of the scan
    #[arg(long, allow_negative_numbers = true)]
    start: f64,

    /// Last energy of the scan
    #[arg(long, allow_negative_numbers = true)]
    end: f64,

    /// Energy step
    #[arg(long, allow_negative_numbers = true)]
    step: f64,

    /// Maximum number of points (defaults to the config value)
    #[arg(long)]
    max_points: Option<usize>,
}

pub(super) fn run_mix_command(context: &CliContext, args: MixArgs) -> Result<i32, CliError> {
    let input = MassMixInput::new(
        args.geometry.sample_edge_step,
        args.geometry.diluent_edge_step,
        args.geometry.total_mass_mg,
        args.geometry.area_cm2()?,
        args.target_edge_step,
    );
    let result = compute_sample_weight_mix(input);

    emit(context, &result, || match result {
        Some(mix) => {
            let mut text = format!(
                "Sample mass: {} mg\nDiluent mass: {} mg",
                context.format_value(mix.sample_mass_mg),
                context.format_value(mix.diluent_mass_mg)
            );
            if let Some(density) = areal_density_g_cm2(mix.total_mass_mg(), input.area_cm2) {
                text.push_str(&format!(
                    "\nAreal density: {} g/cm^2",
                    context.format_value(density)
                ));
            }
            text
        }
        None => format!(
            "No feasible mass split reaches edge-step {}",
            context.format_value(input.target_edge_step)
        ),
    })?;

    Ok(if result.is_some() {
        0
    } else {
        NO_SOLUTION_EXIT_CODE
    })
}

pub(super) fn run_suggest_command(
    context: &CliContext,
    args: SuggestArgs,
) -> Result<i32, CliError> {
    let input = EdgeStepSearchInput {
        sample_edge_step: args.geometry.sample_edge_step,
        diluent_edge_step: args.geometry.diluent_edge_step,
        sample_mu_above: args.sample_mu_above,
        diluent_mu_above: args.diluent_mu_above,
        total_mass_mg: args.geometry.total_mass_mg,
        area_cm2: args.geometry.area_cm2()?,
        target_absorption: args
            .target_absorption
            .unwrap_or(context.config.target_absorption),
    };
    let suggestion = suggest_sample_mix(input);

    emit(context, &suggestion, || {
        render_suggestion(context, &input, suggestion.as_ref())
    })?;

    Ok(if suggestion.is_some() {
        0
    } else {
        NO_SOLUTION_EXIT_CODE
    })
}

fn render_suggestion(
    context: &CliContext,
    input: &EdgeStepSearchInput,
    suggestion: Option<&SuggestedMix>,
) -> String {
    match suggestion {
        Some(suggestion) => format!(
            "Suggested edge-step: {}\nSample mass: {} mg\nDiluent mass: {} mg\nTotal absorption (mu t): {}",
            context.format_value(suggestion.edge_step),
            context.format_value(suggestion.mix.sample_mass_mg),
            context.format_value(suggestion.mix.diluent_mass_mg),
            context.format_value(suggestion.absorption)
        ),
        None => format!(
            "No edge-step in the feasible range reaches mu t = {}",
            context.format_value(input.target_absorption)
        ),
    }
}

#[derive(Debug, Serialize)]
struct ClassificationReport {
    transmission: SuitabilityVerdict,
    fluorescence: SuitabilityVerdict,
    summary: String,
}

pub(super) fn run_classify_command(
    context: &CliContext,
    args: ClassifyArgs,
) -> Result<i32, CliError> {
    let transmission = classify_transmission(args.mu_t);
    let fluorescence = classify_fluorescence(args.r_percent);
    let report = ClassificationReport {
        transmission,
        fluorescence,
        summary: summarize_suitability(transmission.suitable, fluorescence.suitable),
    };

    emit(context, &report, || {
        format!(
            "Transmission (mu t = {}): {}\nFluorescence (R = {}%): {}\n{}",
            context.format_value(transmission.value),
            transmission.label(),
            context.format_value(fluorescence.value),
            fluorescence.label(),
            report.summary
        )
    })?;
    Ok(0)
}

pub(super) fn run_gas_command(context: &CliContext, args: GasArgs) -> Result<i32, CliError> {
    let updated = match args.action {
        GasAction::Add {
            mixture,
            name,
            fraction,
        } => parse_mixture(&mixture.gases)?.rebalance_for_added_gas(name, fraction),
        GasAction::Remove { mixture, index } => {
            parse_mixture(&mixture.gases)?.remove_gas_and_redistribute(index)
        }
        GasAction::Update {
            mixture,
            index,
            fraction,
        } => parse_mixture(&mixture.gases)?.update_gas_fraction_balanced(index, fraction),
    }
    .map_err(XasPrepError::from)?;

    print_mixture(context, &updated)?;
    Ok(0)
}

fn print_mixture(context: &CliContext, mixture: &GasMixture) -> Result<(), CliError> {
    emit(context, mixture, || render_mixture(context, mixture))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeReport {
    point_count: usize,
    max_points: usize,
}

pub(super) fn run_range_command(context: &CliContext, args: RangeArgs) -> Result<i32, CliError> {
    let max_points = args.max_points.unwrap_or(context.config.max_scan_points);
    let point_count = validate_scan_range(args.start, args.end, args.step, max_points)
        .map_err(XasPrepError::from)?;

    let report = RangeReport {
        point_count,
        max_points,
    };
    emit(context, &report, || format!("Points: {point_count}"))?;
    Ok(0)
}
