use std::{env, process};

use anyhow::{Context, bail};
use log::info;
use rand::{SeedableRng, rngs::StdRng};

use studio::{Catalog, ImportOutcome, Session};

const USAGE: &str = "Usage: latentctl <catalog.json> <model> <command> [args]

Commands:
  export <out.png> [seed]             draw a noise vector and save it as a noise image
  import <in.png>                     print the noise vector stored in a noise image
  preview <in.png> <out.png> [scale]  render a noise image as a grayscale preview
  options [payload.json]              apply an options payload, then print the current one";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("{USAGE}");
        process::exit(1);
    }

    let catalog = Catalog::load(&args[1])
        .await
        .with_context(|| format!("cannot load catalog '{}'", args[1]))?;

    let descriptor = catalog.get(&args[2])?;
    let session = Session::new(descriptor)?;
    info!("using model {}", session.model_key());

    let rest = &args[4..];
    match (args[3].as_str(), rest) {
        ("export", [out, seed @ ..]) => {
            let mut rng = match seed.first() {
                Some(seed) => {
                    let seed = seed.parse::<u64>().context("seed must be a number")?;
                    StdRng::seed_from_u64(seed)
                }
                None => StdRng::from_os_rng(),
            };

            session.randomize_noise(&mut rng);
            session.set_noise_random(false);
            session.export_noise_file(out).await?;
        }
        ("import", [input]) => {
            import(&session, input).await?;
            println!("{}", serde_json::to_string(&session.noise().values)?);
        }
        ("preview", [input, out, scale @ ..]) => {
            let scale = match scale.first() {
                Some(scale) => scale.parse::<u32>().context("scale must be a number")?,
                None => 8,
            };

            import(&session, input).await?;
            tokio::fs::write(out, session.noise_preview_png(scale)?).await?;
        }
        ("options", payload) => {
            if let Some(path) = payload.first() {
                let json = tokio::fs::read_to_string(path).await?;
                let report = session.import_payload(&json)?;

                for (key, e) in &report.failures {
                    eprintln!("skipped '{key}': {e}");
                }
            }

            println!("{}", session.export_payload()?);
        }
        (command, _) => {
            eprintln!("Unknown command or arguments: {command}\n\n{USAGE}");
            process::exit(1);
        }
    }

    Ok(())
}

async fn import(session: &Session, path: &str) -> anyhow::Result<()> {
    match session.import_noise_file(path).await? {
        ImportOutcome::Applied => Ok(()),
        ImportOutcome::Stale => bail!("the import of '{path}' was superseded"),
    }
}
