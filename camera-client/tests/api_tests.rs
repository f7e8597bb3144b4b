//! Commands against a mocked camera.

mod common;

use camera_client::{Error, FileList, FlashLight, ListWindow, MonoImage, Source};
use chrono::NaiveDate;
use common::{KEY, MockCamera, endpoint};
use serde_json::json;
use std::fs;
use std::net::TcpListener;
use std::time::Duration;
use wiremock::ResponseTemplate;
use wiremock::matchers::{body_bytes, body_json, header};

#[test]
fn test_get_status() {
    let mock = MockCamera::start();
    let status = json!({"name": "cam-01", "firmware": "2.4.1", "timestamp": "2024-03-01T08:00:00"});
    mock.mount(
        endpoint("GET", "status").respond_with(ResponseTemplate::new(200).set_body_json(&status)),
    );

    let result = mock.camera().get_status().unwrap();
    assert_eq!(status.as_object().unwrap(), &result);
}

#[test]
fn test_get_info() {
    let mock = MockCamera::start();
    let info = json!({"sdcard": {"free": 1024, "total": 32768}, "temperature": 41.5});
    mock.mount(endpoint("GET", "info").respond_with(ResponseTemplate::new(200).set_body_json(&info)));

    let result = mock.camera().get_info().unwrap();
    assert_eq!(info.as_object().unwrap(), &result);
}

#[test]
fn test_status_request_has_no_body() {
    let mock = MockCamera::start();
    mock.mount(endpoint("GET", "status").respond_with(ResponseTemplate::new(200).set_body_json(json!({}))));

    mock.camera().get_status().unwrap();

    let requests = mock.received_requests();
    assert_eq!(1, requests.len());
    assert!(requests[0].body.is_empty());
}

#[test]
fn test_non_200_is_protocol_error() {
    let mock = MockCamera::start();
    mock.mount(endpoint("GET", "info").respond_with(ResponseTemplate::new(500).set_body_string("busy")));

    match mock.camera().get_info() {
        Err(Error::Protocol { status, content }) => {
            assert_eq!(500, status);
            assert_eq!(b"busy".to_vec(), content);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_other_success_status_is_rejected() {
    let mock = MockCamera::start();
    mock.mount(endpoint("GET", "status").respond_with(ResponseTemplate::new(204)));

    let result = mock.camera().get_status();
    assert_eq!(Some(204), result.unwrap_err().status());
}

#[test]
fn test_wrong_key_is_rejected() {
    let mock = MockCamera::start();
    mock.mount(endpoint("GET", "status").respond_with(ResponseTemplate::new(200).set_body_json(json!({}))));

    let mut config = mock.camera().config().clone();
    config.key = "wrong".to_string();
    let camera = camera_client::Camera::new(config).unwrap();

    // unmatched requests are answered with 404 by the mock server
    assert_eq!(Some(404), camera.get_status().unwrap_err().status());
}

#[test]
fn test_malformed_json_is_decode_error() {
    let mock = MockCamera::start();
    mock.mount(endpoint("GET", "status").respond_with(ResponseTemplate::new(200).set_body_string("oops")));

    assert!(matches!(mock.camera().get_status(), Err(Error::Decode(_))));
}

#[test]
fn test_timeout() {
    let mock = MockCamera::start();
    mock.mount(
        endpoint("GET", "status").respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        ),
    );

    let camera = mock.camera().with_timeout(Duration::from_millis(200));
    let result = camera.get_status();
    assert!(matches!(result, Err(Error::Timeout(_))), "{:?}", result);
    assert!(result.unwrap_err().is_transport());
}

#[test]
fn test_restart_timeout() {
    let mock = MockCamera::start();
    mock.mount(
        endpoint("GET", "reset")
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3))),
    );

    let camera = mock.camera().with_timeout(Duration::from_millis(200));
    assert!(matches!(camera.trigger_camera_restart(), Err(Error::Timeout(_))));
}

#[test]
fn test_connection_refused() {
    let address = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let camera = camera_client::Camera::new(camera_client::Config::new(address.to_string(), KEY)).unwrap();

    let result = camera.get_status();
    assert!(matches!(result, Err(Error::Connection(_))), "{:?}", result);
}

#[test]
fn test_restart() {
    let mock = MockCamera::start();
    mock.mount(endpoint("GET", "reset").respond_with(ResponseTemplate::new(200)).expect(1));

    mock.camera().trigger_camera_restart().unwrap();
}

#[test]
fn test_flash_light() {
    let mock = MockCamera::start();
    let settings = json!({"spectrum": 2, "brightness": 300, "time": 500});
    mock.mount(
        endpoint("GET", "flashlight")
            .and(body_json(&settings))
            .respond_with(ResponseTemplate::new(200).set_body_json(&settings)),
    );

    let applied = mock
        .camera()
        .flash_light(&FlashLight {
            spectrum: 2,
            brightness: 300,
            time_ms: 500,
        })
        .unwrap();
    assert_eq!(settings.as_object().unwrap(), &applied);
}

#[test]
fn test_get_file_returns_raw_bytes() {
    let mock = MockCamera::start();
    let content = vec![0xff, 0xd8, 0x00, 0x10, 0x80, 0xfe];
    mock.mount(
        endpoint("GET", "files/get")
            .and(body_json(json!({"filename": "a.jpg", "source": "scheduler"})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone())),
    );

    let file = mock.camera().get_file("a.jpg", &Source::Scheduler).unwrap();
    assert_eq!(content, file);
}

#[test]
fn test_delete_file_twice() {
    let mock = MockCamera::start();
    mock.mount(
        endpoint("GET", "files/delete")
            .and(body_json(json!({"filename": "x.log", "source": "service"})))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1),
    );
    mock.mount(
        endpoint("GET", "files/delete")
            .respond_with(ResponseTemplate::new(404).set_body_string("file not found")),
    );

    let camera = mock.camera();
    camera.delete_file("x.log", &Source::Service).unwrap();
    assert_eq!(
        Some(404),
        camera
            .delete_file("x.log", &Source::Service)
            .unwrap_err()
            .status()
    );
}

#[test]
fn test_get_file_list() {
    let mock = MockCamera::start();
    let list = json!({"total": 2, "source": "service", "files": ["x.log", "y.log"]});
    mock.mount(
        endpoint("GET", "files/list")
            .and(body_json(json!({"source": "service", "index": 0, "limit": 500})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&list)),
    );

    let result = mock
        .camera()
        .get_file_list(&Source::Service, ListWindow::default())
        .unwrap();
    assert_eq!(
        FileList {
            total: 2,
            source: "service".to_string(),
            files: vec!["x.log".to_string(), "y.log".to_string()],
        },
        result
    );
    assert_eq!(list, serde_json::to_value(&result).unwrap());
}

#[test]
fn test_get_files_in_range() {
    let mock = MockCamera::start();
    mock.mount(
        endpoint("GET", "files/firstinrange")
            .and(body_json(json!({
                "startDateTime": "2024-03-01T00:00:00",
                "endDateTime": "2024-03-03T12:30:00",
                "source": "scheduler"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "source": "scheduler",
                "files": ["img_0001.tif"]
            }))),
    );

    let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
    let result = mock
        .camera()
        .get_files_in_range(
            &day(1).and_hms_opt(0, 0, 0).unwrap(),
            &day(3).and_hms_opt(12, 30, 0).unwrap(),
            &Source::Scheduler,
        )
        .unwrap();
    assert_eq!(vec!["img_0001.tif".to_string()], result.files);
}

#[test]
fn test_take_ms_image_uses_capture_timeout() {
    let mock = MockCamera::start();
    mock.mount(
        endpoint("GET", "files/takeimage").respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "total": 2,
                    "source": "scheduler",
                    "files": ["ms_0.tif", "ms_1.tif"]
                }))
                .set_delay(Duration::from_millis(500)),
        ),
    );

    // shorter than the capture, but the capture timeout applies
    let camera = mock.camera().with_timeout(Duration::from_millis(100));
    let result = camera.take_ms_image().unwrap();
    assert_eq!(2, result.total);
    assert_eq!(Source::Scheduler, result.source_folder());
}

#[test]
fn test_take_mono_image_overwrites_file() {
    let mock = MockCamera::start();
    let image = vec![0x49, 0x49, 0x2a, 0x00, 0x08, 0x00];
    mock.mount(
        endpoint("GET", "camera/image.tif")
            .and(body_json(json!({"spectrum": 4, "brightness": 800, "exposure": 0.1})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(image.clone())),
    );

    let dir = tempfile::tempdir().unwrap();
    let filename = dir.path().join("out.tif");
    fs::write(&filename, b"an older, longer image that has to be replaced").unwrap();

    mock.camera()
        .take_mono_image(
            &MonoImage {
                spectrum: 4,
                brightness: 800,
                exposure: 0.1,
            },
            &filename,
        )
        .unwrap();

    assert_eq!(image, fs::read(&filename).unwrap());
}

#[test]
fn test_take_mono_image_write_failure() {
    let mock = MockCamera::start();
    mock.mount(
        endpoint("GET", "camera/image.jpg")
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3])),
    );

    let dir = tempfile::tempdir().unwrap();
    let filename = dir.path().join("missing").join("image.jpg");

    let result = mock.camera().take_mono_image(&MonoImage::default(), &filename);
    match result {
        Err(Error::LocalIo(path, _)) => assert_eq!(filename, path),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_take_mono_image_rejected_leaves_no_file() {
    let mock = MockCamera::start();
    mock.mount(
        endpoint("GET", "camera/image.png")
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid spectrum")),
    );

    let dir = tempfile::tempdir().unwrap();
    let filename = dir.path().join("image.png");

    let result = mock.camera().take_mono_image(&MonoImage::default(), &filename);
    assert_eq!(Some(400), result.unwrap_err().status());
    assert!(!filename.exists());
}

#[test]
fn test_upload_file() {
    let mock = MockCamera::start();
    let content = b"{\"schedule\": [\"08:00\", \"20:00\"]}".to_vec();
    mock.mount(
        endpoint("POST", "files/put/config.json")
            .and(header("content-type", "application/octet-stream"))
            .and(body_bytes(content.clone()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1),
    );

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("local");
    fs::create_dir(&local).unwrap();
    let file_path = local.join("config.json");
    fs::write(&file_path, &content).unwrap();

    mock.camera().upload_file(&file_path).unwrap();
}

#[test]
fn test_upload_missing_file() {
    let mock = MockCamera::start();
    let dir = tempfile::tempdir().unwrap();

    let result = mock.camera().upload_file(dir.path().join("nothing.json"));
    assert!(matches!(result, Err(Error::LocalIo(_, _))));
    assert!(mock.received_requests().is_empty());
}
