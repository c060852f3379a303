use minilabels::prelude::*;

use std::fs;
use std::path::Path;


const TRAIN: &str = "\
0 0:1.0
1 1:1.0
0,1 0:1.0 1:1.0
2:1.0
0 0:1.0 2:0.1
1 1:1.0 2:0.1
";

const TEST: &str = "\
0 0:1.0
1 1:1.0
";


fn write_properties(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("experiment.properties");
    let text = format!(
        "input.trainData = {}\n\
         input.testData = {}\n\
         output = {}\n\
         modelName = model.json\n\
         gaussianVariance = 1.0\n\
         {body}",
        dir.join("train.svm").display(),
        dir.join("test.svm").display(),
        dir.join("output").display(),
    );
    fs::write(&path, text).unwrap();
    path
}


/// End-to-end tests from a properties file.
#[cfg(test)]
pub mod properties_tests {
    use super::*;

    #[test]
    fn run_from_properties() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("train.svm"), TRAIN).unwrap();
        fs::write(dir.path().join("test.svm"), TEST).unwrap();

        let path = write_properties(
            dir.path(),
            "train.warmStart = false\n\
             numClusters = 1\n\
             considerBMM = false\n\
             considerLabelPair = true\n\
             regularizeAll = true\n\
             isLBFGS = false\n\
             numRounds = 3\n\
             saveModel = true\n",
        );

        let properties = Properties::from_file(&path).unwrap();
        let config = TrainingConfig::from_properties(&properties).unwrap();
        assert_eq!(config.warm_start, WarmStart::Off);
        assert!(!config.use_lbfgs);

        let train = SampleReader::new()
            .file(&config.train_data)
            .read()
            .unwrap();
        let test = SampleReader::new()
            .file(&config.test_data)
            .n_classes(train.n_classes())
            .n_features(train.shape().1)
            .read()
            .unwrap();
        assert_eq!(train.shape(), (6, 3));
        assert_eq!(test.shape(), (2, 3));

        let model_path = config.model_path();
        let outcome = TrainingController::new(config)
            .run(&train, &test)
            .unwrap();
        assert_eq!(outcome.snapshots.len(), 3);
        assert!(!outcome.model.consider_bmm());
        assert!(outcome.model.consider_pair());
        assert!(model_path.exists());
    }

    #[test]
    fn unknown_warm_start_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_properties(
            dir.path(),
            "train.warmStart = maybe\nsaveModel = false\n",
        );
        let properties = Properties::from_file(&path).unwrap();
        let err = TrainingConfig::from_properties(&properties).unwrap_err();
        assert!(
            matches!(err, Error::InvalidWarmStartMode(ref mode) if mode == "maybe"),
            "unexpected {err:?}"
        );
    }

    #[test]
    fn fresh_model_needs_its_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_properties(
            dir.path(),
            "train.warmStart = false\n\
             regularizeAll = true\n\
             isLBFGS = true\n\
             numRounds = 3\n\
             saveModel = false\n",
        );
        let properties = Properties::from_file(&path).unwrap();
        let err = TrainingConfig::from_properties(&properties).unwrap_err();
        assert!(
            matches!(err, Error::ConfigKeyMissing { ref key } if key == "numClusters"),
            "unexpected {err:?}"
        );
    }

    #[test]
    fn retrain_needs_the_round_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_properties(
            dir.path(),
            "train.warmStart = auto\n\
             regularizeAll = true\n\
             isLBFGS = true\n\
             saveModel = false\n",
        );
        let properties = Properties::from_file(&path).unwrap();
        let err = TrainingConfig::from_properties(&properties).unwrap_err();
        assert!(
            matches!(err, Error::ConfigKeyMissing { ref key } if key == "numRounds"),
            "unexpected {err:?}"
        );
    }

    #[test]
    fn boolean_type_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_properties(
            dir.path(),
            "train.warmStart = true\nsaveModel = yes\n",
        );
        let properties = Properties::from_file(&path).unwrap();
        let err = TrainingConfig::from_properties(&properties).unwrap_err();
        assert!(
            matches!(
                err,
                Error::ConfigTypeMismatch { ref key, ref value, .. }
                    if key == "saveModel" && value == "yes"
            ),
            "unexpected {err:?}"
        );
    }

    #[test]
    fn malformed_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.svm");
        fs::write(&path, "0 0:1.0\n1 1:oops\n").unwrap();
        let err = SampleReader::new().file(&path).read().unwrap_err();
        assert!(
            matches!(err, Error::SampleFormat { line: 2, .. }),
            "unexpected {err:?}"
        );
    }
}
