//! Keyword based mapping from free exercise text to a motion archetype.

use stickmotion_common::Archetype;

/// Keyword hits needed before an archetype is trusted
pub const MIN_SCORE: usize = 2;

/// True if `keyword` occurs in `text` starting at a word boundary, so
/// "glute" matches "glutes" but "turn" does not match "return"
fn matches_keyword(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(i, _)| {
        text[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric())
    })
}

/// Declarative archetype to keyword table.
///
/// Keywords are lowercase and must start at a word boundary. When two
/// archetypes score the same the one declared first wins.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    table: Vec<(Archetype, Vec<String>)>,
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PatternClassifier {
    pub fn builtin() -> Self {
        let table: [(Archetype, &[&str]); 11] = [
            (
                Archetype::SpinalFlexion,
                &["cat", "cow", "spine", "spinal", "flexion", "arch", "round", "katze", "wirbelsäule"],
            ),
            (
                Archetype::HipBridge,
                &["bridge", "glute", "hip lift", "hips up", "hip raise", "pelvis", "brücke", "becken"],
            ),
            (
                Archetype::Plank,
                &["plank", "side plank", "hips level", "hold", "forearm", "brace", "stütz"],
            ),
            (
                Archetype::Squat,
                &["squat", "knee", "sit back", "thigh", "chair", "kniebeuge"],
            ),
            (
                Archetype::Lunge,
                &["lunge", "step forward", "front knee", "split", "stride", "ausfallschritt"],
            ),
            (
                Archetype::PushUp,
                &["push-up", "push up", "pushup", "chest", "press", "liegestütz"],
            ),
            (
                Archetype::BirdDog,
                &["bird", "dog", "opposite arm", "opposite leg", "all fours", "vierfüßler"],
            ),
            (
                Archetype::SpinalRotation,
                &["twist", "rotation", "rotate", "torso", "drehung"],
            ),
            (
                Archetype::LateralStretch,
                &["side bend", "lateral", "side stretch", "reach over", "side", "seitneige"],
            ),
            (
                Archetype::NeckMobility,
                &["neck", "chin", "head", "nod", "tilt", "nacken"],
            ),
            (
                Archetype::ArmRaise,
                &["arm", "raise", "overhead", "shoulder", "reach", "arme"],
            ),
        ];

        Self {
            table: table
                .into_iter()
                .map(|(a, keywords)| (a, keywords.iter().map(|k| k.to_string()).collect()))
                .collect(),
        }
    }

    /// Append an archetype to the table, after every existing entry
    pub fn add<S: AsRef<str>>(&mut self, archetype: Archetype, keywords: &[S]) {
        let keywords = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
        self.table.retain(|(a, _)| *a != archetype);
        self.table.push((archetype, keywords));
    }

    /// Number of keywords of each archetype found in the text
    pub fn scores(&self, text: &str) -> Vec<(Archetype, usize)> {
        self.table
            .iter()
            .map(|(archetype, keywords)| {
                let hits = keywords.iter().filter(|k| matches_keyword(text, k)).count();
                (archetype.clone(), hits)
            })
            .collect()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(exercise_id = %exercise_id))]
    pub fn classify<S: AsRef<str>>(
        &self,
        exercise_id: &str,
        exercise_name: &str,
        steps: &[S],
        instruction: &str,
    ) -> Archetype {
        let mut text = format!("{exercise_id} {exercise_name}");
        for step in steps {
            text.push(' ');
            text.push_str(step.as_ref());
        }
        text.push(' ');
        text.push_str(instruction);
        let text = text.to_lowercase();

        // Strictly greater keeps the earliest declared archetype on ties
        let mut best: Option<(Archetype, usize)> = None;
        for (archetype, score) in self.scores(&text) {
            if score >= MIN_SCORE && best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((archetype, score));
            }
        }

        match best {
            Some((archetype, score)) => {
                tracing::debug!("classified as {} (score {})", archetype, score);
                archetype
            }
            None => {
                tracing::debug!("no archetype reached the minimum score, using generic");
                Archetype::Generic
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_STEPS: &[&str] = &[];

    #[test]
    fn glute_bridge() {
        let classifier = PatternClassifier::builtin();
        let steps = ["Lie on your back", "Lift the hips toward the ceiling"];
        let archetype = classifier.classify("glute-bridge", "Glute Bridge", &steps, "lift hips slowly");
        assert_eq!(archetype, Archetype::HipBridge);
    }

    #[test]
    fn cat_cow() {
        let classifier = PatternClassifier::builtin();
        let archetype = classifier.classify("cat-cow", "Cat Cow", NO_STEPS, "");
        assert_eq!(archetype, Archetype::SpinalFlexion);
    }

    #[test]
    fn case_insensitive() {
        let classifier = PatternClassifier::builtin();
        let archetype = classifier.classify("X", "BODYWEIGHT SQUAT", &["Bend the KNEES"], "");
        assert_eq!(archetype, Archetype::Squat);
    }

    #[test]
    fn single_hit_is_not_enough() {
        let classifier = PatternClassifier::builtin();
        let archetype = classifier.classify("x1", "Plank", NO_STEPS, "");
        assert_eq!(archetype, Archetype::Generic);
    }

    #[test]
    fn unknown_text_is_generic() {
        let classifier = PatternClassifier::builtin();
        assert_eq!(
            classifier.classify("unknown-id", "Unknown", NO_STEPS, ""),
            Archetype::Generic
        );
        assert_eq!(classifier.classify("", "", NO_STEPS, ""), Archetype::Generic);
    }

    #[test]
    fn ties_go_to_the_earlier_archetype() {
        let classifier = PatternClassifier::builtin();
        // two hits each for spinal flexion and plank
        let archetype = classifier.classify("a", "cat cow", NO_STEPS, "plank hold");
        assert_eq!(archetype, Archetype::SpinalFlexion);
        let scores = classifier.scores("cat cow plank hold");
        assert_eq!(scores[0], (Archetype::SpinalFlexion, 2));
        assert_eq!(scores[2], (Archetype::Plank, 2));
    }

    #[test]
    fn deterministic() {
        let classifier = PatternClassifier::builtin();
        let steps = ["Twist the torso", "Reach overhead with one arm"];
        let a = classifier.classify("mix", "Side twist", &steps, "turn slowly");
        let b = classifier.classify("mix", "Side twist", &steps, "turn slowly");
        assert_eq!(a, b);
    }

    #[test]
    fn side_plank_is_a_plank() {
        let classifier = PatternClassifier::builtin();
        let steps = ["Lie on your side", "Lift the hips off the floor", "Hold the position"];
        let archetype = classifier.classify("side-plank", "Side Plank", &steps, "");
        assert_eq!(archetype, Archetype::Plank);
    }

    #[test]
    fn keywords_do_not_match_inside_words() {
        let classifier = PatternClassifier::builtin();
        let text = "return overhead forearm warm inside ground";
        for (archetype, hits) in classifier.scores(text) {
            match archetype {
                // "forearm" and "overhead" are keywords in their own right
                Archetype::Plank | Archetype::ArmRaise => assert_eq!(hits, 1, "{archetype}"),
                _ => assert_eq!(hits, 0, "{archetype}"),
            }
        }
        assert!(matches_keyword("lift the glutes", "glute"));
        assert!(matches_keyword("cat-cow", "cow"));
        assert!(!matches_keyword("return", "turn"));
    }

    #[test]
    fn added_archetypes_are_matched() {
        let mut classifier = PatternClassifier::builtin();
        let wall_sit = Archetype::Custom("wall_sit".into());
        classifier.add(wall_sit.clone(), &["Wall", "sit"]);
        assert_eq!(
            classifier.classify("wall-sit", "Wall Sit", NO_STEPS, ""),
            wall_sit
        );

        // re-adding replaces the keywords rather than duplicating the entry
        classifier.add(wall_sit.clone(), &["wall", "lean"]);
        let entries = classifier.scores("").into_iter().filter(|(a, _)| *a == wall_sit).count();
        assert_eq!(entries, 1);
    }
}
