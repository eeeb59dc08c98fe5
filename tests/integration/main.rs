//! Integration tests for sample-mirror

const INDEX: &str = r#"[
  {"path":"hpc-samples/Nbody","sha":"0af2","example":{"name":"nbody","categories":["HPC/Segment Samples"],"description":"An N-body simulation."}},
  {"path":"hpc-samples/Particle_Diffusion","sha":"0af2","example":{"name":"Particle-Diffusion","categories":["HPC/Segment Samples"],"description":"Monte Carlo diffusion."}},
  {"path":"hpc-samples/iso3dfd","sha":"0af2","example":{"name":"ISO3DFD","description":"Finite difference stencil kernel.","toolchain":["dpcpp"],"os":["noknownOS"]}},
  {"path":"hpc-samples/mandelbrot","sha":"0af2","example":{"name":"Mandelbrot","description":"mandelbrot sample.","os":["noknownOS"]}}
]"#;

/// A gzipped tarball holding `hello/main.cpp`
fn sample_tarball() -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let gz = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(gz);
    let body = b"int main() { return 0; }\n";
    let mut header = tar::Header::new_gnu();
    header.set_path("hello/main.cpp").unwrap();
    header.set_size(body.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, &body[..]).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

mod mirror_tests {
    use super::INDEX;
    use httpmock::prelude::*;
    use sample_mirror::transport::HttpTransport;
    use sample_mirror::{Mirror, MirrorError, MirrorOptions};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn options(server: &MockServer, dir: &TempDir) -> MirrorOptions {
        MirrorOptions::new(server.base_url(), dir.path(), vec!["cpp".to_string()])
    }

    fn transport() -> Arc<HttpTransport> {
        Arc::new(HttpTransport::default())
    }

    #[tokio::test]
    async fn os_filtering_end_to_end() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cpp.json");
                then.status(200).body(INDEX);
            })
            .await;
        let dir = TempDir::new().unwrap();

        let filtered = Mirror::open(options(&server, &dir), transport())
            .await
            .unwrap();
        assert_eq!(filtered.samples_for("cpp").unwrap().len(), 2);

        let mut opts = options(&server, &dir);
        opts.ignore_os = true;
        let unfiltered = Mirror::open(opts, transport()).await.unwrap();
        assert_eq!(unfiltered.samples_for("cpp").unwrap().len(), 4);
    }

    #[tokio::test]
    async fn local_index_is_byte_identical_to_remote() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cpp.json");
                then.status(200).body(INDEX);
            })
            .await;
        let dir = TempDir::new().unwrap();

        let mirror = Mirror::open(options(&server, &dir), transport())
            .await
            .unwrap();

        let local = std::fs::read(mirror.local_path().join("cpp.json")).unwrap();
        assert_eq!(local, INDEX.as_bytes());
    }

    #[tokio::test]
    async fn not_found_index_fails_construction() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cpp.json");
                then.status(404);
            })
            .await;
        let dir = TempDir::new().unwrap();

        let err = Mirror::open(options(&server, &dir), transport())
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::OfflineNoCache { .. }));
    }

    #[tokio::test]
    async fn garbage_index_fails_construction() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cpp.json");
                then.status(200).body("This is not JSON ¯\\_(ツ)_/¯ ");
            })
            .await;
        let dir = TempDir::new().unwrap();

        let err = Mirror::open(options(&server, &dir), transport())
            .await
            .unwrap_err();
        assert!(matches!(err, MirrorError::IndexDecode { .. }));
    }

    #[tokio::test]
    async fn lazy_fetch_hits_network_once() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cpp.json");
                then.status(200).body(INDEX);
            })
            .await;
        let archive = server
            .mock_async(|when, then| {
                when.method(GET).path("/hpc-samples/Nbody/cpp.tar.gz");
                then.status(200).body(super::sample_tarball());
            })
            .await;
        let dir = TempDir::new().unwrap();
        let mirror = Mirror::open(options(&server, &dir), transport())
            .await
            .unwrap();

        let first = mirror.fetcher().fetch("cpp", "hpc-samples/Nbody").await.unwrap();
        let second = mirror.fetcher().fetch("cpp", "hpc-samples/Nbody").await.unwrap();

        assert_eq!(first, second);
        archive.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn bulk_failure_poisons_until_cleared() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cpp.json");
                then.status(200).body(INDEX);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/hpc-samples/Nbody/cpp.tar.gz");
                then.status(200).body("ok");
            })
            .await;
        let broken = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/hpc-samples/Particle_Diffusion/cpp.tar.gz");
                then.status(500);
            })
            .await;
        let dir = TempDir::new().unwrap();
        let mut opts = options(&server, &dir);
        opts.bulk = true;

        let err = Mirror::open(opts.clone(), transport()).await.unwrap_err();
        assert!(matches!(err, MirrorError::BulkRetrieval { failed: 1, total: 2 }));
        broken.assert_hits_async(3).await;

        let err = Mirror::open(opts.clone(), transport()).await.unwrap_err();
        assert!(matches!(err, MirrorError::CacheLocked { .. }));

        sample_mirror::cache::CacheStore::new(dir.path())
            .clear()
            .await
            .unwrap();
        opts.bulk = false;
        assert!(Mirror::open(opts, transport()).await.is_ok());
    }
}

mod cli_tests {
    use super::INDEX;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use httpmock::prelude::*;
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Binary isolated from the user's config file and cache
    fn sample_mirror(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("sample-mirror");
        cmd.env("SAMPLE_MIRROR_CONFIG", home.path().join("config.toml"))
            .arg("--directory")
            .arg(home.path().join("cache"));
        cmd
    }

    fn serve_index(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/cpp.json");
            then.status(200).body(INDEX);
        });
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("sample-mirror")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Local mirror of a remote per-language sample catalog",
            ));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("sample-mirror")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("sample-mirror"));
    }

    #[test]
    fn list_languages() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        serve_index(&server);

        sample_mirror(&home)
            .args(["--url", &server.base_url(), "--languages", "cpp", "list"])
            .assert()
            .success()
            .stdout(predicate::str::diff("cpp\n"));
    }

    #[test]
    fn list_samples_respects_os_filter() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        serve_index(&server);

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "list", "cpp", "-f", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hpc-samples/Nbody"))
            .stdout(predicate::str::contains("mandelbrot").not());

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "--ignore-os", "list", "cpp", "-f", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hpc-samples/mandelbrot"));
    }

    #[test]
    fn list_ignores_bulk_flag() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        serve_index(&server);
        let archive = server.mock(|when, then| {
            when.method(GET).path("/hpc-samples/Nbody/cpp.tar.gz");
            then.status(200).body(super::sample_tarball());
        });

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "--bulk", "list"])
            .assert()
            .success();

        archive.assert_hits(0);
        assert!(!home.path().join("cache/v1/cpp/hpc-samples").exists());
    }

    #[test]
    fn unknown_language_is_rejected() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        serve_index(&server);

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "list", "rust"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("available languages: cpp"));
    }

    #[test]
    fn offline_without_cache_fails_with_hint() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/cpp.json");
            then.status(503);
        });

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no local index"))
            .stderr(predicate::str::contains("http_proxy"));
    }

    #[test]
    fn locked_cache_requires_clean() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        serve_index(&server);
        let root = home.path().join("cache").join("v1");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("lock"), b"").unwrap();

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("locked"))
            .stderr(predicate::str::contains("sample-mirror clean"));

        sample_mirror(&home)
            .args(["clean", "--yes"])
            .assert()
            .success();
        assert!(!root.exists());

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "list"])
            .assert()
            .success();
    }

    #[test]
    fn create_extracts_sample() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        serve_index(&server);
        server.mock(|when, then| {
            when.method(GET).path("/hpc-samples/Nbody/cpp.tar.gz");
            then.status(200).body(super::sample_tarball());
        });
        let dest = home.path().join("project");

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "create", "cpp", "hpc-samples/Nbody"])
            .arg(&dest)
            .assert()
            .success();

        assert!(dest.join("hello").join("main.cpp").is_file());
    }

    #[test]
    fn sync_fetches_every_visible_archive() {
        let home = TempDir::new().unwrap();
        let server = MockServer::start();
        serve_index(&server);
        let archives = server.mock(|when, then| {
            when.method(GET).path_contains("/hpc-samples/");
            then.status(200).body("archive");
        });

        sample_mirror(&home)
            .args(["-u", &server.base_url(), "-l", "cpp", "sync"])
            .assert()
            .success()
            .stdout(predicate::str::contains("up to date"));

        archives.assert_hits(2);
        assert!(home
            .path()
            .join("cache/v1/cpp/hpc-samples/Nbody/cpp.tar.gz")
            .is_file());
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        sample_mirror(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        sample_mirror(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }
}
