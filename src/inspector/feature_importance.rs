use rayon::prelude::*;

use crate::boosting::{MultiLabelBoosting, RegressionTree};

use std::collections::BTreeMap;


/// Cumulative importance of a single feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureImportance {
    /// Column index of the feature.
    pub feature_index: usize,
    /// Name of the feature, as first seen.
    pub feature_name: String,
    /// Sum of the feature's importance over every tree considered.
    pub cumulative_score: f64,
}


/// Running per-feature totals.
/// 
/// Entries are keyed by feature index, so [`Self::into_ranking`]
/// breaks score ties by ascending feature index.
#[derive(Debug, Clone, Default)]
pub struct FeatureImportanceAccumulator {
    totals: BTreeMap<usize, (String, f64)>,
}


impl FeatureImportanceAccumulator {
    /// Construct an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Add `score` to the total of `feature_index`.
    /// The name given on the first call for an index is kept.
    pub fn add<S: AsRef<str>>(&mut self, feature_index: usize, name: S, score: f64) {
        let entry = self.totals.entry(feature_index)
            .or_insert_with(|| (name.as_ref().to_string(), 0f64));
        entry.1 += score;
    }


    /// Add every entry of a per-tree importance map.
    pub fn add_tree(&mut self, importance: &BTreeMap<usize, (String, f64)>) {
        for (&index, (name, score)) in importance {
            self.add(index, name, *score);
        }
    }


    /// Number of distinct features seen so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.totals.len()
    }


    /// Returns `true` if nothing has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }


    /// Features sorted by descending cumulative score.
    pub fn into_ranking(self) -> Vec<FeatureImportance> {
        let mut ranking = self.totals.into_iter()
            .map(|(feature_index, (feature_name, cumulative_score))| {
                FeatureImportance {
                    feature_index,
                    feature_name,
                    cumulative_score,
                }
            })
            .collect::<Vec<_>>();

        // `sort_by` is stable; equal scores stay in index order.
        ranking.sort_by(|a, b| {
            b.cumulative_score.total_cmp(&a.cumulative_score)
        });
        ranking
    }
}


// Per-tree maps are computed in parallel,
// then folded into `acc` in tree order.
fn accumulate_class(
    acc: &mut FeatureImportanceAccumulator,
    model: &MultiLabelBoosting,
    class: usize,
)
{
    let trees = model.trees(class).collect::<Vec<_>>();
    let per_tree = trees.into_par_iter()
        .map(RegressionTree::feature_importance)
        .collect::<Vec<_>>();

    for importance in per_tree.iter() {
        acc.add_tree(importance);
    }
}


/// Cumulative importances of the trees of `class`,
/// sorted by descending score.
pub fn feature_importances(
    model: &MultiLabelBoosting,
    class: usize,
) -> Vec<FeatureImportance>
{
    feature_importances_of_all(std::slice::from_ref(model), class)
}


/// Same as [`feature_importances`] but summed over several models.
pub fn feature_importances_of_all(
    models: &[MultiLabelBoosting],
    class: usize,
) -> Vec<FeatureImportance>
{
    let mut acc = FeatureImportanceAccumulator::new();
    for model in models {
        accumulate_class(&mut acc, model, class);
    }
    acc.into_ranking()
}


/// `(feature index, feature name)` pairs of the trees of `class`,
/// most important first.
pub fn top_features(model: &MultiLabelBoosting, class: usize)
    -> Vec<(usize, String)>
{
    into_pairs(feature_importances(model, class))
}


/// Same as [`top_features`] but summed over several models.
pub fn top_features_of_all(models: &[MultiLabelBoosting], class: usize)
    -> Vec<(usize, String)>
{
    into_pairs(feature_importances_of_all(models, class))
}


/// Feature indices of [`top_features`], in the same order.
pub fn top_feature_indices(model: &MultiLabelBoosting, class: usize)
    -> Vec<usize>
{
    top_features(model, class).into_iter()
        .map(|(index, _)| index)
        .collect()
}


/// Feature indices of [`top_features_of_all`], in the same order.
pub fn top_feature_indices_of_all(
    models: &[MultiLabelBoosting],
    class: usize,
) -> Vec<usize>
{
    top_features_of_all(models, class).into_iter()
        .map(|(index, _)| index)
        .collect()
}


/// Feature names of [`top_features`], in the same order.
pub fn top_feature_names(model: &MultiLabelBoosting, class: usize)
    -> Vec<String>
{
    top_features(model, class).into_iter()
        .map(|(_, name)| name)
        .collect()
}


/// Feature names of [`top_features_of_all`], in the same order.
pub fn top_feature_names_of_all(
    models: &[MultiLabelBoosting],
    class: usize,
) -> Vec<String>
{
    top_features_of_all(models, class).into_iter()
        .map(|(_, name)| name)
        .collect()
}


#[inline]
fn into_pairs(ranking: Vec<FeatureImportance>) -> Vec<(usize, String)> {
    ranking.into_iter()
        .map(|f| (f.feature_index, f.feature_name))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_is_kept() {
        let mut acc = FeatureImportanceAccumulator::new();
        acc.add(3, "first", 1.0);
        acc.add(3, "second", 2.0);
        let ranking = acc.into_ranking();
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].feature_name, "first");
        assert_eq!(ranking[0].cumulative_score, 3.0);
    }

    #[test]
    fn test_ties_by_ascending_index() {
        let mut acc = FeatureImportanceAccumulator::new();
        acc.add(9, "z", 1.0);
        acc.add(2, "x", 1.0);
        acc.add(5, "y", 4.0);
        acc.add(4, "w", 1.0);

        let exp = vec![5, 2, 4, 9];
        let res = acc.into_ranking()
            .into_iter()
            .map(|f| f.feature_index)
            .collect::<Vec<_>>();
        assert_eq!(exp, res, "expected {exp:?}, got {res:?}.");
    }

    #[test]
    fn test_empty_model() {
        let model = MultiLabelBoosting::new(3);
        assert!(top_features(&model, 0).is_empty());
        assert!(top_features(&model, 99).is_empty());
        assert!(top_features_of_all(&[], 0).is_empty());
    }
}
