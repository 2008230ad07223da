use serde::{Deserialize, Serialize};

pub mod evaluation;

pub use evaluation::{EvaluationDisplay, EvaluationMetric};

/// A catalog entry from movies.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(alias = "movie_id")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// One shared attribute explaining a recommendation, e.g. `{"f": "christopher_nolan", "c": 2}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCount {
    #[serde(rename = "f")]
    pub name: String,
    #[serde(rename = "c")]
    pub count: f64,
}

/// A ranked recommendation for some target title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: i64,
    pub title: String,
    pub score: f64,
    #[serde(default)]
    pub features: Vec<FeatureCount>,
}

/// A movie's position in the 3D projection of the feature space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifoldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_deserializes_short_feature_keys() {
        let raw = json!({
            "id": 155,
            "title": "The Dark Knight",
            "score": 0.41234567,
            "features": [{"f": "christopher_nolan", "c": 2}, {"f": "batman", "c": 1.5}]
        });

        let candidate: Candidate = serde_json::from_value(raw).unwrap();

        assert_eq!(candidate.id, 155);
        assert_eq!(candidate.features.len(), 2);
        assert_eq!(candidate.features[0].name, "christopher_nolan");
        assert_eq!(candidate.features[0].count, 2.0);
        assert_eq!(candidate.features[1].count, 1.5);
    }

    #[test]
    fn test_candidate_without_features() {
        let raw = json!({"id": 1, "title": "Heat", "score": 0.3});
        let candidate: Candidate = serde_json::from_value(raw).unwrap();
        assert!(candidate.features.is_empty());
    }

    #[test]
    fn test_movie_accepts_movie_id_alias_and_missing_genres() {
        let raw = json!({"movie_id": 19995, "title": "Avatar"});
        let movie: Movie = serde_json::from_value(raw).unwrap();
        assert_eq!(movie.id, 19995);
        assert!(movie.genres.is_empty());
    }
}
