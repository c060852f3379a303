//! JSON persistence shared by the models of this crate.
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;


type Source = Box<dyn std::error::Error + Send + Sync>;


/// Write `value` to `path` as JSON.
/// Every failure is reported as [`Error::ModelSave`].
pub(crate) fn save_json<T, P>(value: &T, path: P) -> Result<()>
    where T: Serialize,
          P: AsRef<Path>,
{
    let path = path.as_ref();
    let save_error = |source: Source| {
        Error::ModelSave { path: path.to_path_buf(), source }
    };

    let file = File::create(path).map_err(|e| save_error(e.into()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .map_err(|e| save_error(e.into()))?;
    writer.flush().map_err(|e| save_error(e.into()))?;
    Ok(())
}


/// Read a value written by [`save_json`].
/// Every failure is reported as [`Error::ModelLoad`].
pub(crate) fn load_json<T, P>(path: P) -> Result<T>
    where T: DeserializeOwned,
          P: AsRef<Path>,
{
    let path = path.as_ref();
    let load_error = |source: Source| {
        Error::ModelLoad { path: path.to_path_buf(), source }
    };

    let file = File::open(path).map_err(|e| load_error(e.into()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| load_error(e.into()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.json");
        let exp = vec![(1_usize, "a".to_string()), (2, "b".to_string())];
        save_json(&exp, &path).unwrap();
        let res: Vec<(usize, String)> = load_json(&path).unwrap();
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn test_errors_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_json::<Vec<f64>, _>(&missing).unwrap_err();
        assert!(
            matches!(err, Error::ModelLoad { ref path, .. } if *path == missing),
            "unexpected {err:?}"
        );

        let unwritable = dir.path().join("no").join("such").join("dir.json");
        let err = save_json(&1.0, &unwritable).unwrap_err();
        assert!(
            matches!(err, Error::ModelSave { ref path, .. } if *path == unwritable),
            "unexpected {err:?}"
        );

        std::fs::write(&missing, "not json").unwrap();
        let err = load_json::<Vec<f64>, _>(&missing).unwrap_err();
        assert!(matches!(err, Error::ModelLoad { .. }), "unexpected {err:?}");
    }
}
