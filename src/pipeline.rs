use tracing::info;

use crate::concat;
use crate::download::slides::{self, DownloadSummary};
use crate::download::store::{ensure_dir, LocalStore};
use crate::download::throttle::Throttle;
use crate::download::DownloadClient;
use crate::error::Result;
use crate::manifest::fetch_manifest;
use crate::options::Options;
use crate::talk::Talk;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Rows in the manifest, malformed ones included
    pub manifest_entries: usize,
    pub slides: usize,
    pub images: DownloadSummary,
    pub concat_written: bool,
}

/// Fetches manifest and slides of `talk` and writes its concat list.
pub async fn run<T: Throttle>(
    client: &DownloadClient,
    throttle: &mut T,
    talk: &Talk,
    options: &Options,
) -> Result<Report> {
    let folder = talk.folder(&options.output_root);
    let slides_folder = folder.join("slides");
    ensure_dir(&folder)?;
    ensure_dir(&slides_folder)?;

    let parser = options.manifest_format.parser();
    let table = fetch_manifest(
        client,
        throttle,
        parser.as_ref(),
        &options.base_data_url,
        talk,
        &folder,
    )
    .await?;
    let slides = table.resolve(options.on_malformed)?;
    info!(
        "Manifest of {} lists {} slides ({} entries)",
        talk.id,
        slides.len(),
        table.len()
    );

    let store = LocalStore::new(options.existing_images);
    let images = slides::download_slides(
        client,
        throttle,
        &store,
        &options.base_data_url,
        &talk.id,
        slides::select(&slides, options.slide_offset),
        options.size,
        &slides_folder,
    )
    .await?;

    let concat_written = concat::write_concat_file(&folder, &slides, options.size.as_str())?;

    Ok(Report {
        manifest_entries: table.len(),
        slides: slides.len(),
        images,
        concat_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::download::throttle::Unthrottled;
    use crate::error::Error;
    use crate::manifest::{MalformedPolicy, ManifestFormat};
    use crate::download::slides::SizeTier;

    const MANIFEST: &str = r#"{"slides":[
        {"time":1000,"image":{"name":"a"}},
        null,
        {"time":4500,"image":{"name":"b"}},
        {"time":9000,"image":{"name":"c"}}
    ]}"#;

    async fn platform() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/123/v1/slides.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/data/123/slides/medium/[a-z]+\.jpg$"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"jpeg".to_vec(), "image/jpeg"))
            .mount(&server)
            .await;
        server
    }

    fn options(server: &MockServer, root: &TempDir) -> Options {
        Options {
            output_root: root.path().to_path_buf(),
            base_data_url: format!("{}/data/", server.uri()),
            size: SizeTier::Medium,
            ..Options::default()
        }
    }

    #[tokio::test]
    async fn builds_the_full_output_tree() {
        let server = platform().await;
        let root = TempDir::new().unwrap();
        let client = DownloadClient::new("agent", None, 0).unwrap();
        let talk = Talk::new("123", "talk", "workshop");

        let report = run(&client, &mut Unthrottled, &talk, &options(&server, &root)).await.unwrap();

        assert_eq!(
            report,
            Report {
                manifest_entries: 4,
                slides: 3,
                images: DownloadSummary { downloaded: 3, cached: 0 },
                concat_written: true,
            }
        );

        let folder = root.path().join("workshop").join("talk-123");
        assert!(folder.join("123.json").is_file());
        for file in ["1000-a-medium.jpg", "4500-b-medium.jpg", "9000-c-medium.jpg"] {
            assert!(folder.join("slides").join(file).is_file(), "{} missing", file);
        }
        let concat = std::fs::read_to_string(folder.join(concat::CONCAT_FILE_NAME)).unwrap();
        assert_eq!(concat.lines().count(), 7);
        assert!(concat.ends_with("duration 30\nfile 'slides/9000-c-medium.jpg'\n"));
    }

    #[tokio::test]
    async fn second_run_only_uses_local_files() {
        let server = platform().await;
        let root = TempDir::new().unwrap();
        let client = DownloadClient::new("agent", None, 0).unwrap();
        let talk = Talk::new("123", "talk", "workshop");
        let options = options(&server, &root);

        run(&client, &mut Unthrottled, &talk, &options).await.unwrap();
        let requests = server.received_requests().await.unwrap().len();

        let report = run(&client, &mut Unthrottled, &talk, &options).await.unwrap();

        assert_eq!(server.received_requests().await.unwrap().len(), requests);
        assert_eq!(report.images, DownloadSummary { downloaded: 0, cached: 3 });
        assert!(!report.concat_written);
    }

    #[tokio::test]
    async fn negative_offset_downloads_only_trailing_slides() {
        let server = platform().await;
        let root = TempDir::new().unwrap();
        let client = DownloadClient::new("agent", None, 0).unwrap();
        let talk = Talk::new("123", "talk", "workshop");
        let options = Options {
            slide_offset: -1,
            ..options(&server, &root)
        };

        let report = run(&client, &mut Unthrottled, &talk, &options).await.unwrap();

        assert_eq!(report.images.downloaded, 1);
        let slides_folder = root.path().join("workshop").join("talk-123").join("slides");
        assert!(slides_folder.join("9000-c-medium.jpg").is_file());
        assert!(!slides_folder.join("1000-a-medium.jpg").exists());
    }

    #[tokio::test]
    async fn fail_policy_stops_before_any_image_download() {
        let server = platform().await;
        let root = TempDir::new().unwrap();
        let client = DownloadClient::new("agent", None, 0).unwrap();
        let talk = Talk::new("123", "talk", "workshop");
        let options = Options {
            on_malformed: MalformedPolicy::Fail,
            ..options(&server, &root)
        };

        let err = run(&client, &mut Unthrottled, &talk, &options).await.unwrap_err();

        assert!(matches!(err, Error::MalformedSlide { index: 1 }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn xml_manifests_feed_the_same_pipeline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/55/55.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<videoContent><slide><time>0</time><slideName>x</slideName></slide>\
                 <slide><time>2000</time><slideName>y</slideName></slide></videoContent>",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/data/55/slides/big/[a-z]\.jpg$"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"jpeg".to_vec(), "image/jpeg"))
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let client = DownloadClient::new("agent", None, 0).unwrap();
        let talk = Talk::new("55", "xml-talk", "conference");
        let options = Options {
            output_root: root.path().to_path_buf(),
            base_data_url: format!("{}/data/", server.uri()),
            manifest_format: ManifestFormat::Xml,
            ..Options::default()
        };

        let report = run(&client, &mut Unthrottled, &talk, &options).await.unwrap();

        assert_eq!(report.slides, 2);
        assert!(root.path().join("conference").join("xml-talk-55").join("55.xml").is_file());
    }

    #[tokio::test]
    async fn slides_path_taken_by_a_file_is_reported() {
        let server = platform().await;
        let root = TempDir::new().unwrap();
        let folder = root.path().join("workshop").join("talk-123");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("slides"), "").unwrap();

        let client = DownloadClient::new("agent", None, 0).unwrap();
        let talk = Talk::new("123", "talk", "workshop");

        let err = run(&client, &mut Unthrottled, &talk, &options(&server, &root)).await.unwrap_err();

        assert!(matches!(err, Error::PathCollision(path) if path == folder.join("slides")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
