use std::io;
use utils_crate::error::UtilsError;

#[test]
fn test_io_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let path_str = "MouseExpressionMatrix_ROI_Region134_scaled.csv";
    let utils_err = UtilsError::io_with_path(io_err, path_str);

    match utils_err {
        UtilsError::Io {
            source,
            path: Some(p),
        } => {
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
            assert_eq!(p, path_str);
        }
        _ => panic!("Expected UtilsError::Io variant with path"),
    }

    let utils_err_no_path: UtilsError = io::Error::new(io::ErrorKind::Other, "other io error").into();
    match utils_err_no_path {
        UtilsError::Io { source, path: None } => {
            assert!(source.to_string().contains("other io error"));
        }
        _ => panic!("Expected UtilsError::Io variant without path"),
    }
}

#[test]
fn test_error_formatting() {
    assert_eq!(
        UtilsError::Config("Invalid config format".to_string()).to_string(),
        "Configuration error: Invalid config format"
    );
    assert_eq!(
        UtilsError::InvalidParameter("batch size".to_string()).to_string(),
        "Invalid parameter: batch size"
    );
    assert_eq!(
        UtilsError::ResourceNotFound("data/x.csv".to_string()).to_string(),
        "Resource not found: data/x.csv"
    );
}

#[cfg(feature = "config_toml")]
#[test]
fn test_toml_error_conversion() {
    let parse_err = toml::from_str::<toml::Table>("[logging\nlevel = 1").unwrap_err();
    let utils_err: UtilsError = parse_err.into();
    assert!(matches!(utils_err, UtilsError::Config(ref msg) if msg.starts_with("TOML parse error")));
}
