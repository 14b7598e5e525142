//! Command-line definition and translation into a clip job

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::clip::{ClipJob, ClipOptions};
use crate::engine::{BurnSource, OutputType};
use crate::errors::{ClipError, ClipResult};
use crate::vector::FeatureSelection;

/// Build the clap definition of the `rasterclip` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("rasterclip")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Maurice Schilpp")
        .about("Clip, mask or burn a GeoTIFF raster with a vector cutline")
        .arg(Arg::new("src").help("Input raster").value_name("SRC").required(true).index(1))
        .arg(Arg::new("clipsrc").help("Cutline vector dataset (GeoJSON)").value_name("CLIPSRC").required(true).index(2))
        .arg(Arg::new("dst").help("Output raster").value_name("DST").required(true).index(3))
        .arg(
            Arg::new("burn")
                .short('b')
                .long("burn")
                .help("Burn this value into a blank raster instead of masking")
                .value_name("VALUE")
                .allow_negative_numbers(true)
                .conflicts_with("attribute"),
        )
        .arg(
            Arg::new("attribute")
                .short('t')
                .long("attribute")
                .help("Burn the value of this attribute into a blank raster")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("dstnodata")
                .short('n')
                .long("dstnodata")
                .help("Nodata value for pixels outside the cutline")
                .value_name("VALUE")
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("dstalpha")
                .short('a')
                .long("dstalpha")
                .help("Add an alpha band marking pixels outside the cutline")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("crop_to_cutline")
                .short('c')
                .long("crop_to_cutline")
                .help("Crop the output extent to the selected features")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("invert")
                .short('i')
                .long("invert")
                .help("Keep what lies outside the selected features")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("where")
                .short('w')
                .long("where")
                .help("Attribute predicate selecting features")
                .value_name("EXPRESSION"),
        )
        .arg(
            Arg::new("sql")
                .short('s')
                .long("sql")
                .help("Query selecting features (SELECT * FROM layer [WHERE ...])")
                .value_name("QUERY"),
        )
        .arg(
            Arg::new("ot")
                .short('o')
                .long("ot")
                .help("Output pixel type (Byte, Int16, UInt16, Int32, UInt32, Float32, Float64, ...)")
                .value_name("TYPE"),
        )
        .arg(
            Arg::new("overwrite")
                .short('v')
                .long("overwrite")
                .help("Overwrite the output without asking")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration file (defaults to rasterclip.toml when present)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the engine command line without running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
}

fn parse_number(args: &ArgMatches, name: &str) -> ClipResult<Option<f64>> {
    args.get_one::<String>(name)
        .map(|value| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| ClipError::InvalidArgument(format!("--{} expects a number, got '{}'", name, value)))
        })
        .transpose()
}

fn required_path(args: &ArgMatches, name: &str) -> ClipResult<String> {
    args.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| ClipError::InvalidArgument(format!("Missing {}", name)))
}

/// Translate parsed arguments into a clip job
pub fn job_from_args(args: &ArgMatches) -> ClipResult<ClipJob> {
    let burn = match (parse_number(args, "burn")?, args.get_one::<String>("attribute")) {
        (Some(_), Some(_)) => {
            return Err(ClipError::InvalidArgument("--burn and --attribute are mutually exclusive".to_string()))
        },
        (Some(value), None) => Some(BurnSource::Value(value)),
        (None, Some(name)) => Some(BurnSource::Attribute(name.clone())),
        (None, None) => None,
    };

    let output_type = args
        .get_one::<String>("ot")
        .map(|ot| ot.parse::<OutputType>())
        .transpose()?;

    let options = ClipOptions {
        burn,
        dst_alpha: args.get_flag("dstalpha"),
        dst_nodata: parse_number(args, "dstnodata")?,
        crop_to_cutline: args.get_flag("crop_to_cutline"),
        invert: args.get_flag("invert"),
        selection: FeatureSelection::new(args.get_one::<String>("where").cloned(), args.get_one::<String>("sql").cloned()),
        output_type,
        overwrite: args.get_flag("overwrite"),
    };

    Ok(ClipJob::new(
        required_path(args, "src")?,
        required_path(args, "clipsrc")?,
        required_path(args, "dst")?,
        options,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn job(extra: &[&str]) -> ClipResult<ClipJob> {
        let mut argv = vec!["rasterclip"];
        argv.extend_from_slice(extra);
        argv.extend_from_slice(&["in.tif", "shapes.geojson", "out.tif"]);
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        job_from_args(&matches)
    }

    #[test]
    fn test_defaults_mask_mode() {
        let job = job(&[]).unwrap();
        assert_eq!(job.input, Path::new("in.tif"));
        assert_eq!(job.cutline, Path::new("shapes.geojson"));
        assert_eq!(job.output, Path::new("out.tif"));
        assert_eq!(job.options, ClipOptions::default());
    }

    #[test]
    fn test_short_flags() {
        let job = job(&["-b", "-1", "-n", "-9999", "-a", "-c", "-i", "-w", "zone = 'A'", "-o", "float32", "-v"]).unwrap();
        let options = job.options;
        assert_eq!(options.burn, Some(BurnSource::Value(-1.0)));
        assert_eq!(options.dst_nodata, Some(-9999.0));
        assert!(options.dst_alpha && options.crop_to_cutline && options.invert && options.overwrite);
        assert_eq!(options.selection.where_clause.as_deref(), Some("zone = 'A'"));
        assert_eq!(options.output_type, Some(OutputType::Float32));
    }

    #[test]
    fn test_attribute_burn() {
        let job = job(&["--attribute", "height", "--sql", "SELECT * FROM shapes"]).unwrap();
        assert_eq!(job.options.burn, Some(BurnSource::Attribute("height".to_string())));
        assert_eq!(job.options.selection.sql.as_deref(), Some("SELECT * FROM shapes"));
    }

    #[test]
    fn test_burn_and_attribute_conflict() {
        let result = build_cli().try_get_matches_from(["rasterclip", "-b", "1", "-t", "h", "a", "b", "c"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(job(&["-o", "Float16x"]), Err(ClipError::InvalidOutputType(_))));
        assert!(matches!(job(&["-b", "high"]), Err(ClipError::InvalidArgument(_))));
    }
}
