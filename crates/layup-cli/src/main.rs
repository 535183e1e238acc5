use std::path::PathBuf;
use std::process::ExitCode;

use layup_index::{
    ElementInfo, IndexerConfig, LayupContext, Selection, Spot, material_id_to_layer_indices,
    select_by_material_ids, select_indices,
};
use layup_io::{MetadataSource, SnapshotFile, load_config};
use layup_model::{EntityId, LayupMesh};

fn usage() {
    eprintln!("usage:");
    eprintln!("  layup-cli info <snapshot.json> <element-id>");
    eprintln!(
        "  layup-cli select <snapshot.json> <element-id> [--layers a,b] [--nodes a,b] [--spots bottom,top,middle]"
    );
    eprintln!("  layup-cli material <snapshot.json> <element-id> <material-id>");
    eprintln!("  layup-cli ply <snapshot.json> <ply-name> <element-id>");
    eprintln!("  layup-cli plies <snapshot.json>");
    eprintln!("  layup-cli summary <snapshot.json>");
    eprintln!("options:");
    eprintln!("  --config <indexer.json>");
}

#[derive(Debug, PartialEq)]
enum Command {
    Info { element: EntityId },
    Select { element: EntityId, selection: Selection },
    Material { element: EntityId, material: i64 },
    Ply { name: String, element: EntityId },
    Plies,
    Summary,
}

#[derive(Debug, PartialEq)]
struct Invocation {
    snapshot: PathBuf,
    config: Option<PathBuf>,
    command: Command,
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("invalid {what}: '{value}'"))
}

fn parse_list<T, F>(value: &str, parse: F) -> Result<Vec<T>, String>
where
    F: Fn(&str) -> Result<T, String>,
{
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(parse)
        .collect()
}

fn parse_selection(options: &[String]) -> Result<Selection, String> {
    let mut selection = Selection::all();
    let mut iter = options.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--layers" => {
                selection = selection.with_layers(parse_list(value, |v| parse_number(v, "layer"))?)
            }
            "--nodes" => {
                selection = selection.with_nodes(parse_list(value, |v| parse_number(v, "node"))?)
            }
            "--spots" => {
                let spots = parse_list(value, |v| {
                    v.parse::<Spot>().map_err(|err| err.to_string())
                })?;
                selection = selection.with_spots(spots)
            }
            other => return Err(format!("unknown option {other}")),
        }
    }
    Ok(selection)
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut config = None;
    let mut rest = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().ok_or("missing value for --config")?;
            config = Some(PathBuf::from(path));
        } else {
            rest.push(arg.clone());
        }
    }

    let (name, snapshot) = match rest.as_slice() {
        [name, snapshot, ..] => (name.as_str(), PathBuf::from(snapshot)),
        _ => return Err("missing command or snapshot".to_string()),
    };
    let operands = &rest[2..];

    let command = match (name, operands) {
        ("info", [element]) => Command::Info {
            element: parse_number(element, "element id")?,
        },
        ("select", [element, options @ ..]) => Command::Select {
            element: parse_number(element, "element id")?,
            selection: parse_selection(options)?,
        },
        ("material", [element, material]) => Command::Material {
            element: parse_number(element, "element id")?,
            material: parse_number(material, "material id")?,
        },
        ("ply", [ply, element]) => Command::Ply {
            name: ply.clone(),
            element: parse_number(element, "element id")?,
        },
        ("plies", []) => Command::Plies,
        ("summary", []) => Command::Summary,
        _ => return Err(format!("unknown command or wrong arguments: {name}")),
    };

    Ok(Invocation {
        snapshot,
        config,
        command,
    })
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn info_lines(info: &ElementInfo) -> Vec<String> {
    vec![
        format!("element_id: {}", info.id),
        format!("element_type: {}", info.element_type),
        format!("layered: {}", info.is_layered),
        format!("shell: {}", info.is_shell),
        format!("layers: {}", info.n_layers),
        format!("corner_nodes: {}", info.n_corner_nodes),
        format!("nodes_per_spot_plane: {}", info.nodes_per_spot_plane()),
        format!("spots: {} [{}]", info.n_spots, join(info.spots())),
        format!("material_ids: {}", join(&info.material_ids)),
        format!("block_len: {}", info.block_len()),
    ]
}

fn offset_lines(offsets: &[usize]) -> Vec<String> {
    vec![
        format!("count: {}", offsets.len()),
        format!("offsets: {}", join(offsets)),
    ]
}

fn require_info(ctx: &LayupContext<'_>, element: EntityId) -> Result<ElementInfo, String> {
    ctx.element_info(element)
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("element {element} has no lay-up information"))
}

fn run_command(mesh: &LayupMesh, config: IndexerConfig, command: &Command) -> Result<Vec<String>, String> {
    let ctx = LayupContext::new(mesh, config).map_err(|err| err.to_string())?;
    let lines = match command {
        Command::Info { element } => match ctx.element_info(*element).map_err(|err| err.to_string())? {
            Some(info) => info_lines(&info),
            None => vec![
                format!("element_id: {element}"),
                "postprocessable: false".to_string(),
            ],
        },
        Command::Select { element, selection } => {
            let info = require_info(&ctx, *element)?;
            let offsets = select_indices(&info, selection).map_err(|err| err.to_string())?;
            offset_lines(&offsets)
        }
        Command::Material { element, material } => {
            let info = require_info(&ctx, *element)?;
            let layers = material_id_to_layer_indices(&info, *material);
            let offsets =
                select_by_material_ids(&info, &[*material]).map_err(|err| err.to_string())?;
            let mut lines = vec![format!("layers: {}", join(&layers))];
            lines.extend(offset_lines(&offsets));
            lines
        }
        Command::Ply { name, element } => {
            let layer = ctx
                .ply_to_layer_index(name, *element)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| format!("analysis ply '{name}' is not part of element {element}"))?;
            let offsets = ctx
                .select_ply(name, *element)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| format!("element {element} has no lay-up information"))?;
            let mut lines = vec![format!("layer: {layer}")];
            lines.extend(offset_lines(&offsets));
            lines
        }
        Command::Plies => ctx.all_ply_names().into_iter().map(str::to_string).collect(),
        Command::Summary => mesh.summary().format().lines().map(str::to_string).collect(),
    };
    Ok(lines)
}

fn run(invocation: &Invocation) -> Result<Vec<String>, String> {
    let config = match &invocation.config {
        Some(path) => load_config(path).map_err(|err| format!("{}: {err}", path.display()))?,
        None => IndexerConfig::default(),
    };
    let source = SnapshotFile::new(&invocation.snapshot);
    log::info!("Loading {}", source.describe());
    let mesh = source
        .fetch()
        .map_err(|err| format!("{}: {err}", invocation.snapshot.display()))?;
    run_command(&mesh, config, &invocation.command)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("error: {err}");
            usage();
            return ExitCode::from(2);
        }
    };

    match run(&invocation) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
