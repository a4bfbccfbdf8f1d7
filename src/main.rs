mod concat;
mod download;
mod error;
mod file;
mod logging;
mod manifest;
mod options;
mod pipeline;
mod talk;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use download::slides::SizeTier;
use download::store::ExistingFile;
use download::throttle::FixedInterval;
use download::DownloadClient;
use manifest::{MalformedPolicy, ManifestFormat};
use talk::{Talk, DEFAULT_FORMAT};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[clap(subcommand)]
    subcmd: SubCmd,

    #[clap(short = 's', long, alias = "slide_neg_index", default_value = "0", allow_negative_numbers = true, global = true)]
    /// skip this many leading slides, or keep only the last N when negative
    slide_neg_index: i64,

    #[clap(long, value_enum, default_value_t = SizeTier::Big, global = true)]
    /// size of the slide images
    size: SizeTier,

    #[clap(long, default_value = options::DEFAULT_USER_AGENT, global = true)]
    /// user agent sent with every request
    useragent: String,

    #[clap(long, default_value = options::DEFAULT_BASE_DATA_URL, value_parser = url_parser, global = true)]
    /// url the manifest and slide urls are built from
    basedataurl: String,

    #[clap(long, default_value = "0.2", value_parser = seconds_parser, global = true)]
    /// seconds to wait between two requests
    waittime: f64,

    #[clap(short, long, value_enum, default_value_t = ManifestFormat::Json, global = true)]
    /// format of the slide manifest
    manifest: ManifestFormat,

    #[clap(short, long, default_value = options::DEFAULT_OUTPUT_ROOT, global = true)]
    /// folder everything is downloaded into
    output: PathBuf,

    #[clap(long, value_enum, default_value_t = MalformedPolicy::Skip, global = true)]
    /// what to do with manifest entries that have no time or slide name
    on_malformed: MalformedPolicy,

    #[clap(long, global = true)]
    /// download slide images again even if they already exist
    overwrite: bool,

    #[clap(short, long, default_value = "0", global = true)]
    /// set the maximum number of retries per request
    retries: usize,

    #[clap(long, value_parser = seconds_parser, global = true)]
    /// request timeout in seconds
    timeout: Option<f64>,

    #[clap(short, long, global = true)]
    /// log debug output
    verbose: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about)]
enum SubCmd {
    /// Download the slides of a talk given its id and name
    Ids {
        /// numeric id of the talk
        id: String,

        /// name of the talk, used for the output folder
        name: String,

        #[clap(default_value = DEFAULT_FORMAT)]
        /// event category, used for the output folder
        format: String,
    },
    /// Download the slides of a talk given its page url
    Url {
        #[clap(value_parser = url_parser)]
        /// url of the talk page, e.g. https://slideslive.com/38956520/talk-name
        url: String,

        #[clap(default_value = DEFAULT_FORMAT)]
        /// event category, used for the output folder
        format: String,
    },
    /// Download the slides of every talk listed in a json file
    File {
        #[clap(default_value = "talks.json")]
        /// json array of {"id", "name", "format"} or {"url", "format"} objects
        file: PathBuf,
    },
}

fn url_parser(url: &str) -> Result<String, String> {
    if url.starts_with("http") {
        Ok(url.to_string())
    } else {
        Err("URL must start with http or https".to_string())
    }
}

fn seconds_parser(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        Ok(_) => Err("must be a non negative number of seconds".to_string()),
        Err(err) => Err(err.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logging::init_tracing(args.verbose);

    let options = options::Options {
        output_root: args.output,
        base_data_url: args.basedataurl,
        user_agent: args.useragent,
        manifest_format: args.manifest,
        size: args.size,
        slide_offset: args.slide_neg_index,
        wait_time: Duration::from_secs_f64(args.waittime),
        max_download_retries: args.retries,
        request_timeout: args.timeout.map(Duration::from_secs_f64),
        on_malformed: args.on_malformed,
        existing_images: if args.overwrite { ExistingFile::Overwrite } else { ExistingFile::Skip },
    };

    tracing::debug!("Options: {:?}", options);

    let client = DownloadClient::new(&options.user_agent, options.request_timeout, options.max_download_retries)?;
    let mut throttle = FixedInterval::new(options.wait_time);

    let talk = match args.subcmd {
        SubCmd::File { file } => {
            let summary = file::download_file(&file, &client, &mut throttle, &options).await?;
            info!(
                "Finished reading {}: {} downloaded, {} skipped, {} failed",
                file.display(),
                summary.finished,
                summary.skipped,
                summary.failed
            );
            return Ok(());
        }
        SubCmd::Ids { id, name, format } => Talk::new(id, name, format),
        SubCmd::Url { url, format } => match Talk::from_url(&url, format) {
            Ok(talk) => talk,
            Err(err) => {
                error!("{}", err);
                return Err(err.into());
            }
        },
    };

    match pipeline::run(&client, &mut throttle, &talk, &options).await {
        Ok(report) => {
            info!(
                "Finished {} ({}): {} of {} manifest entries usable, {} downloaded, {} already present",
                talk.name, talk.id, report.slides, report.manifest_entries, report.images.downloaded, report.images.cached
            );
            if !report.concat_written && report.slides > 0 {
                info!("Kept the existing {}", concat::CONCAT_FILE_NAME);
            }
            Ok(())
        }
        Err(err) => {
            error!("Error downloading slides of {} ({}): {}", talk.name, talk.id, err);
            Err(err.into())
        }
    }
}
