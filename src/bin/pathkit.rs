#![warn(unused)]

use anyhow::Result;
use clap::{crate_version, value_parser};
use itertools::Itertools;

use pathkit::{
    pathkit_log, Angle, BevelJoiner, ButtCapper, Capper, Joiner, MiterJoiner, Path, RoundCapper,
    RoundJoiner, SquareCapper, Transform,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum Cap {
    Butt,
    Round,
    Square,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum Join {
    Bevel,
    Round,
    Miter,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    Canonical,
    Svg,
    Ps,
    Pdf,
}

#[derive(Debug, Clone, PartialEq)]
struct Dash {
    offset: f64,
    pattern: Vec<f64>,
}

/// Command-line options for `pathkit`.
#[derive(Debug)]
struct Opt {
    path_data: String,
    translate: Option<(f64, f64)>,
    scale: Option<(f64, f64)>,
    skew: Option<(f64, f64)>,
    rotate: Option<f64>,
    about: Option<(f64, f64)>,
    reverse: bool,
    optimize: bool,
    flatten: bool,
    dash: Option<Dash>,
    stroke: Option<f64>,
    cap: Cap,
    join: Join,
    miter_limit: f64,
    format: Format,
    info: bool,
}

fn parse_number(v: &str) -> Result<f64, String> {
    match v.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        Ok(_) => Err(format!("'{v}' is not a finite number")),
        Err(e) => Err(format!("'{v}': {e}")),
    }
}

fn parse_pair(v: &str) -> Result<(f64, f64), String> {
    v.split(',')
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect_tuple()
        .ok_or_else(|| format!("expected two numbers separated by a comma, got '{v}'"))
}

fn parse_width(v: &str) -> Result<f64, String> {
    match parse_number(v)? {
        w if w >= 0.0 => Ok(w),
        _ => Err(String::from("Invalid stroke width")),
    }
}

fn parse_miter_limit(v: &str) -> Result<f64, String> {
    match parse_number(v)? {
        l if l >= 1.0 => Ok(l),
        _ => Err(String::from("Invalid miter limit: it must be at least 1")),
    }
}

fn parse_dash(v: &str) -> Result<Dash, String> {
    let (offset, lengths) = v
        .split_once(':')
        .ok_or_else(|| format!("expected OFFSET:L1,L2,..., got '{v}'"))?;

    let offset = parse_number(offset)?;
    let pattern = lengths
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()?;

    if pattern.iter().any(|l| *l < 0.0) {
        return Err(String::from("Invalid dash pattern: lengths must not be negative"));
    }

    Ok(Dash { offset, pattern })
}

fn build_cli() -> clap::Command {
    clap::Command::new("pathkit")
        .version(concat!("version ", crate_version!()))
        .about("Transforms, strokes and dashes SVG path data.")
        .arg(
            clap::Arg::new("translate")
                .long("translate")
                .value_name("X,Y")
                .help("Translate the path by X,Y")
                .allow_hyphen_values(true)
                .value_parser(parse_pair),
        )
        .arg(
            clap::Arg::new("scale")
                .long("scale")
                .value_name("X,Y")
                .help("Scale the path by X horizontally and Y vertically")
                .allow_hyphen_values(true)
                .value_parser(parse_pair),
        )
        .arg(
            clap::Arg::new("skew")
                .long("skew")
                .value_name("AX,AY")
                .help("Skew the path by AX degrees along the x axis and AY degrees along the y axis")
                .allow_hyphen_values(true)
                .value_parser(parse_pair),
        )
        .arg(
            clap::Arg::new("rotate")
                .long("rotate")
                .value_name("DEG")
                .help("Rotate the path counter-clockwise by DEG degrees")
                .allow_hyphen_values(true)
                .value_parser(parse_number),
        )
        .arg(
            clap::Arg::new("about")
                .long("about")
                .value_name("X,Y")
                .help("Scale, skew and rotate around X,Y instead of the origin")
                .allow_hyphen_values(true)
                .value_parser(parse_pair),
        )
        .arg(
            clap::Arg::new("reverse")
                .long("reverse")
                .help("Reverse the direction of every subpath")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("optimize")
                .long("optimize")
                .help("Remove degenerate and redundant commands")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("flatten")
                .long("flatten")
                .help("Replace curves and arcs by lines")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("dash")
                .long("dash")
                .value_name("OFFSET:L1,L2,...")
                .help("Cut the path into dashes with the given offset and pattern")
                .allow_hyphen_values(true)
                .value_parser(parse_dash),
        )
        .arg(
            clap::Arg::new("stroke")
                .long("stroke")
                .value_name("WIDTH")
                .help("Replace the path by the outline of its stroke")
                .value_parser(parse_width),
        )
        .arg(
            clap::Arg::new("cap")
                .long("cap")
                .help("Cap style for the ends of open subpaths")
                .default_value("butt")
                .value_parser(value_parser!(Cap)),
        )
        .arg(
            clap::Arg::new("join")
                .long("join")
                .help("Join style for the corners of the stroke")
                .default_value("miter")
                .value_parser(value_parser!(Join)),
        )
        .arg(
            clap::Arg::new("miter-limit")
                .long("miter-limit")
                .value_name("F")
                .help("Miter limit, as a ratio of miter length to stroke width")
                .default_value("4")
                .value_parser(parse_miter_limit),
        )
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .help("Output format")
                .default_value("canonical")
                .value_parser(value_parser!(Format)),
        )
        .arg(
            clap::Arg::new("info")
                .long("info")
                .help("Print the length, bounds and flags of the result instead of the path")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("PATH_DATA")
                .help("Path data in SVG syntax")
                .required(true)
                .allow_hyphen_values(true),
        )
}

fn parse_args() -> Opt {
    let matches = build_cli().get_matches();

    Opt {
        path_data: matches
            .get_one::<String>("PATH_DATA")
            .cloned()
            .unwrap_or_default(),
        translate: matches.get_one("translate").copied(),
        scale: matches.get_one("scale").copied(),
        skew: matches.get_one("skew").copied(),
        rotate: matches.get_one("rotate").copied(),
        about: matches.get_one("about").copied(),
        reverse: matches.get_flag("reverse"),
        optimize: matches.get_flag("optimize"),
        flatten: matches.get_flag("flatten"),
        dash: matches.get_one::<Dash>("dash").cloned(),
        stroke: matches.get_one("stroke").copied(),
        cap: matches.get_one("cap").copied().unwrap_or(Cap::Butt),
        join: matches.get_one("join").copied().unwrap_or(Join::Miter),
        miter_limit: matches.get_one("miter-limit").copied().unwrap_or(4.0),
        format: matches
            .get_one("format")
            .copied()
            .unwrap_or(Format::Canonical),
        info: matches.get_flag("info"),
    }
}

/// The transform from the command line; scaling goes first, then skewing and
/// rotation, all around the `--about` point, then translation.
fn transform(opt: &Opt) -> Option<Transform> {
    if opt.translate.is_none()
        && opt.scale.is_none()
        && opt.skew.is_none()
        && opt.rotate.is_none()
    {
        return None;
    }

    let mut t = Transform::identity();

    if let Some((sx, sy)) = opt.scale {
        t = t.post_scale(sx, sy);
    }

    if let Some((ax, ay)) = opt.skew {
        let skew = Transform::new_skew(Angle::from_degrees(ax), Angle::from_degrees(ay));
        t = t.post_transform(&skew);
    }

    if let Some(deg) = opt.rotate {
        t = t.post_rotate(Angle::from_degrees(deg));
    }

    if let Some((cx, cy)) = opt.about {
        t = t.pre_translate(-cx, -cy).post_translate(cx, cy);
    }

    if let Some((tx, ty)) = opt.translate {
        t = t.post_translate(tx, ty);
    }

    Some(t)
}

fn capper(cap: Cap) -> Box<dyn Capper> {
    match cap {
        Cap::Butt => Box::new(ButtCapper),
        Cap::Round => Box::new(RoundCapper),
        Cap::Square => Box::new(SquareCapper),
    }
}

fn joiner(join: Join, miter_limit: f64) -> Box<dyn Joiner> {
    match join {
        Join::Bevel => Box::new(BevelJoiner),
        Join::Round => Box::new(RoundJoiner),
        Join::Miter => Box::new(MiterJoiner::new(miter_limit)),
    }
}

fn process(opt: &Opt) -> Result<Path> {
    let mut path = Path::parse(&opt.path_data).map_err(|e| {
        pathkit_log!("could not parse {:?}: {}", opt.path_data, e);
        e
    })?;

    if let Some(t) = transform(opt) {
        path = path.transform(&t);
    }

    if opt.reverse {
        path = path.reverse();
    }

    if opt.optimize {
        path = path.optimize();
    }

    if opt.flatten {
        path = path.flatten();
    }

    if let Some(ref dash) = opt.dash {
        path = path.dash(dash.offset, &dash.pattern);
    }

    if let Some(width) = opt.stroke {
        let capper = capper(opt.cap);
        let joiner = joiner(opt.join, opt.miter_limit);
        path = path.stroke(width, capper.as_ref(), joiner.as_ref());
    }

    Ok(path)
}

fn info(path: &Path) -> String {
    let bounds = path.bounds();

    format!(
        "length: {}\nbounds: {} {} {} {}\nclosed: {}\nempty: {}",
        path.length(),
        bounds.x0,
        bounds.y0,
        bounds.x1,
        bounds.y1,
        path.is_closed(),
        path.is_empty(),
    )
}

fn main() -> Result<()> {
    let opt = parse_args();

    let path = process(&opt)?;

    if opt.info {
        println!("{}", info(&path));
        return Ok(());
    }

    let output = match opt.format {
        Format::Canonical => path.to_string(),
        Format::Svg => path.to_svg(),
        Format::Ps => path.to_postscript(),
        Format::Pdf => path.to_pdf(),
    };

    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn pairs() {
        assert_eq!(parse_pair("1,-2.5"), Ok((1.0, -2.5)));
        assert!(parse_pair("1").is_err());
        assert!(parse_pair("1,2,3").is_err());
        assert!(parse_pair("a,b").is_err());
    }

    #[test]
    fn dash_patterns() {
        assert_eq!(
            parse_dash("-1:2,1"),
            Ok(Dash {
                offset: -1.0,
                pattern: vec![2.0, 1.0]
            })
        );
        assert_eq!(
            parse_dash("0:"),
            Ok(Dash {
                offset: 0.0,
                pattern: vec![]
            })
        );
        assert!(parse_dash("2,1").is_err());
        assert!(parse_dash("0:1,-1").is_err());
    }

    #[test]
    fn limits() {
        assert!(parse_width("-1").is_err());
        assert_eq!(parse_width("0"), Ok(0.0));
        assert!(parse_miter_limit("0.5").is_err());
        assert!(parse_number("inf").is_err());
    }
}
