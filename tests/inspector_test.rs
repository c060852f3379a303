use minilabels::prelude::*;
use minilabels::inspector::feature_importances;


// A (index 0) splits with gain 0.5, then B (index 1) with gain 0.3.
fn tree_ab() -> RegressionTree {
    let inner = Node::branch(
        Splitter::new(1, "B", 0.5),
        Node::leaf(-1.0),
        Node::leaf(0.5),
        0.3,
    );
    let root = Node::branch(
        Splitter::new(0, "A", 0.5),
        inner,
        Node::leaf(1.0),
        0.5,
    );
    RegressionTree::from(root)
}


// Splits C (index 2) twice and A once.
fn tree_cac() -> RegressionTree {
    let right = Node::branch(
        Splitter::new(2, "C", 2.0),
        Node::leaf(0.1),
        Node::leaf(0.2),
        0.25,
    );
    let left = Node::branch(
        Splitter::new(0, "A", 0.5),
        Node::leaf(-0.3),
        Node::leaf(-0.1),
        0.125,
    );
    let root = Node::branch(
        Splitter::new(2, "C", 1.0),
        left,
        right,
        2.0,
    );
    RegressionTree::from(root)
}


fn model() -> MultiLabelBoosting {
    let mut model = MultiLabelBoosting::new(3);
    model.push_regressor(0, ConstantRegressor::new(-0.2));
    model.push_regressor(0, tree_ab());
    model.push_regressor(0, tree_cac());
    model.push_regressor(0, ConstantRegressor::new(0.05));

    model.push_regressor(1, tree_ab());

    model.push_regressor(2, ConstantRegressor::new(1.0));
    model
}


fn sample() -> MultiLabelSample {
    let rows = vec![
        SparseRow::new(vec![]),
        SparseRow::new(vec![(0, 1.0)]),
        SparseRow::new(vec![(1, 1.0)]),
        SparseRow::new(vec![(2, 1.5)]),
        SparseRow::new(vec![(0, 1.0), (2, 3.0)]),
        SparseRow::new(vec![(1, 1.0), (2, 0.5)]),
        SparseRow::new(vec![(0, 0.2), (1, 0.7), (2, 9.0)]),
    ];
    let labels = vec![MultiLabel::new(); rows.len()];
    MultiLabelSample::from_rows(rows, labels, 3, 3)
}


/// Tests for the feature ranking.
#[cfg(test)]
pub mod feature_ranking_tests {
    use super::*;

    #[test]
    fn concrete_scenario() {
        let mut single = MultiLabelBoosting::new(1);
        single.push_regressor(0, tree_ab());

        let exp = vec![(0, "A".to_string()), (1, "B".to_string())];
        let res = top_features(&single, 0);
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");

        let scores = feature_importances(&single, 0)
            .into_iter()
            .map(|f| f.cumulative_score)
            .collect::<Vec<_>>();
        assert_eq!(scores, vec![0.5, 0.3]);

        let both = vec![single.clone(), single];
        let ranking = minilabels::inspector::feature_importances_of_all(&both, 0);
        let exp = vec![
            (0, "A".to_string(), 1.0),
            (1, "B".to_string(), 0.6),
        ];
        let res = ranking.into_iter()
            .map(|f| (f.feature_index, f.feature_name, f.cumulative_score))
            .collect::<Vec<_>>();
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn conservation() {
        let model = model();
        for class in 0..model.n_classes() {
            let exp = model.trees(class)
                .flat_map(|tree| tree.feature_importance().into_values())
                .map(|(_, score)| score)
                .sum::<f64>();
            let res = feature_importances(&model, class)
                .into_iter()
                .map(|f| f.cumulative_score)
                .sum::<f64>();
            assert!(
                (exp - res).abs() < 1e-12,
                "class {class}: expected {exp}, got {res}."
            );
        }
    }

    #[test]
    fn ordering_and_projections() {
        let model = model();
        let ranking = feature_importances(&model, 0);
        assert!(
            ranking.windows(2)
                .all(|w| w[0].cumulative_score >= w[1].cumulative_score),
            "ranking is not sorted: {ranking:?}"
        );

        // C: 2.25, A: 0.625, B: 0.3
        let exp = vec![2, 0, 1];
        let res = top_feature_indices(&model, 0);
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");

        let pairs = top_features(&model, 0);
        let names = top_feature_names(&model, 0);
        let indices = top_feature_indices(&model, 0);
        assert_eq!(
            pairs.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            indices,
        );
        assert_eq!(
            pairs.into_iter().map(|(_, n)| n).collect::<Vec<_>>(),
            names,
        );
    }

    #[test]
    fn singleton_list_identity() {
        let model = model();
        let models = std::slice::from_ref(&model);
        for class in 0..4 {
            assert_eq!(
                top_features(&model, class),
                top_features_of_all(models, class),
            );
            assert_eq!(
                top_feature_indices(&model, class),
                top_feature_indices_of_all(models, class),
            );
            assert_eq!(
                top_feature_names(&model, class),
                top_feature_names_of_all(models, class),
            );
        }
    }

    #[test]
    fn additivity() {
        let a = model();
        let mut b = MultiLabelBoosting::new(3);
        b.push_regressor(0, tree_cac());

        let score_of = |ranking: &[FeatureImportance], index: usize| {
            ranking.iter()
                .find(|f| f.feature_index == index)
                .map(|f| f.cumulative_score)
                .unwrap_or(0.0)
        };

        let ra = feature_importances(&a, 0);
        let rb = feature_importances(&b, 0);
        let both = minilabels::inspector::feature_importances_of_all(
            &[a.clone(), b.clone()], 0
        );
        for index in 0..3 {
            let exp = score_of(&ra[..], index) + score_of(&rb[..], index);
            let res = score_of(&both[..], index);
            assert!(
                (exp - res).abs() < 1e-12,
                "feature {index}: expected {exp}, got {res}."
            );
        }
    }

    #[test]
    fn ties_are_broken_by_index() {
        let mut model = MultiLabelBoosting::new(1);
        for feature in [4, 1, 3] {
            let root = Node::branch(
                Splitter::new(feature, format!("f{feature}"), 0.0),
                Node::leaf(0.0),
                Node::leaf(1.0),
                1.0,
            );
            model.push_regressor(0, RegressionTree::from(root));
        }
        let exp = vec![1, 3, 4];
        let res = top_feature_indices(&model, 0);
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn degenerate_and_out_of_range() {
        let model = model();
        assert!(top_features(&model, 2).is_empty());
        assert!(top_features(&model, 3).is_empty());
        assert!(top_feature_names_of_all(&[model.clone(), model], 9).is_empty());
    }
}


/// Tests for the decision path counting.
#[cfg(test)]
pub mod path_count_tests {
    use super::*;

    #[test]
    fn row_conservation() {
        let model = model();
        let sample = sample();
        for class in 0..2 {
            let counts = count_path_matches(&model, &sample, class);
            let total = counts.values().sum::<usize>();
            assert_eq!(total, sample.n_data_points());
            assert!(counts.keys().all(|key| key.leaves().len() == model.trees(class).count()));
        }
    }

    #[test]
    fn paths_follow_the_trees() {
        let mut model = MultiLabelBoosting::new(1);
        model.push_regressor(0, tree_ab());
        let sample = sample();

        // Leaves of `tree_ab`: 0 = (A < .5, B < .5), 1 = (A < .5, B >= .5), 2 = A >= .5
        let counts = count_path_matches(&model, &sample, 0);
        assert_eq!(counts.get(&PathKey(vec![0])), Some(&2));
        assert_eq!(counts.get(&PathKey(vec![1])), Some(&3));
        assert_eq!(counts.get(&PathKey(vec![2])), Some(&2));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn degenerate_ensemble_is_empty() {
        let model = model();
        let sample = sample();
        assert!(count_path_matches(&model, &sample, 2).is_empty());
        assert!(count_path_matches(&model, &sample, 42).is_empty());
    }

    #[test]
    fn deterministic() {
        let model = model();
        let sample = sample();
        assert_eq!(
            count_path_matches(&model, &sample, 0),
            count_path_matches(&model, &sample, 0),
        );
    }
}
