use crate::detection::FaceSignal;
use std::fmt;

pub const SMILING_THRESHOLD: f32 = 0.15;
pub const EYE_OPEN_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmojiCategory {
    Smile,
    Frown,
    LeftWink,
    RightWink,
    LeftWinkFrown,
    RightWinkFrown,
    ClosedEyesSmile,
    ClosedEyesFrown,
}

impl EmojiCategory {
    pub const ALL: [EmojiCategory; 8] = [
        EmojiCategory::Smile,
        EmojiCategory::Frown,
        EmojiCategory::LeftWink,
        EmojiCategory::RightWink,
        EmojiCategory::LeftWinkFrown,
        EmojiCategory::RightWinkFrown,
        EmojiCategory::ClosedEyesSmile,
        EmojiCategory::ClosedEyesFrown,
    ];

    /// Position of the category within [`EmojiCategory::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// File stem of the category's asset within an asset directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            EmojiCategory::Smile => "smile",
            EmojiCategory::Frown => "frown",
            EmojiCategory::LeftWink => "leftwink",
            EmojiCategory::RightWink => "rightwink",
            EmojiCategory::LeftWinkFrown => "leftwinkfrown",
            EmojiCategory::RightWinkFrown => "rightwinkfrown",
            EmojiCategory::ClosedEyesSmile => "closed_smile",
            EmojiCategory::ClosedEyesFrown => "closed_frown",
        }
    }
}

impl fmt::Display for EmojiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Category(EmojiCategory),
    /// At least one expression signal was absent.
    InsufficientData,
}

impl Classification {
    pub fn category(self) -> Option<EmojiCategory> {
        match self {
            Classification::Category(c) => Some(c),
            Classification::InsufficientData => None,
        }
    }
}

pub fn classify(signal: &FaceSignal) -> Classification {
    match (
        signal.smiling_probability,
        signal.left_eye_open_probability,
        signal.right_eye_open_probability,
    ) {
        (Some(smiling), Some(left_open), Some(right_open)) => {
            Classification::Category(classify_probabilities(smiling, left_open, right_open))
        }
        _ => Classification::InsufficientData,
    }
}

/// Maps fully-present signals onto a category. Thresholds are inclusive.
pub fn classify_probabilities(smiling: f32, left_open: f32, right_open: f32) -> EmojiCategory {
    let smiling = smiling >= SMILING_THRESHOLD;
    let left_open = left_open >= EYE_OPEN_THRESHOLD;
    let right_open = right_open >= EYE_OPEN_THRESHOLD;

    match (smiling, left_open, right_open) {
        (true, true, false) => EmojiCategory::RightWink,
        (true, false, true) => EmojiCategory::LeftWink,
        (true, true, true) => EmojiCategory::Smile,
        (true, false, false) => EmojiCategory::ClosedEyesSmile,
        (false, true, false) => EmojiCategory::RightWinkFrown,
        (false, false, true) => EmojiCategory::LeftWinkFrown,
        (false, true, true) => EmojiCategory::Frown,
        (false, false, false) => EmojiCategory::ClosedEyesFrown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::rect::Rect;

    fn signal(smiling: Option<f32>, left: Option<f32>, right: Option<f32>) -> FaceSignal {
        FaceSignal::new(Rect::from_tl(0, 0, 10, 10), smiling, left, right)
    }

    fn category(smiling: f32, left: f32, right: f32) -> Classification {
        classify(&signal(Some(smiling), Some(left), Some(right)))
    }

    #[test]
    fn test_decision_table() {
        use EmojiCategory::*;

        let cases = [
            ((0.9, 0.9, 0.1), RightWink),
            ((0.9, 0.1, 0.9), LeftWink),
            ((0.9, 0.9, 0.9), Smile),
            ((0.9, 0.1, 0.1), ClosedEyesSmile),
            ((0.05, 0.9, 0.1), RightWinkFrown),
            ((0.05, 0.1, 0.9), LeftWinkFrown),
            ((0.05, 0.9, 0.9), Frown),
            ((0.05, 0.1, 0.1), ClosedEyesFrown),
        ];

        for ((s, l, r), expected) in cases {
            assert_eq!(category(s, l, r), Classification::Category(expected));
        }
    }

    #[test]
    fn test_smiling_threshold_inclusive() {
        assert_eq!(
            category(0.15, 0.9, 0.9),
            Classification::Category(EmojiCategory::Smile)
        );
        assert_eq!(
            category(0.1499, 0.9, 0.9),
            Classification::Category(EmojiCategory::Frown)
        );
    }

    #[test]
    fn test_eye_threshold_inclusive() {
        assert_eq!(
            category(0.9, 0.5, 0.9),
            Classification::Category(EmojiCategory::Smile)
        );
        assert_eq!(
            category(0.9, 0.4999, 0.9),
            Classification::Category(EmojiCategory::LeftWink)
        );
        assert_eq!(
            category(0.9, 0.9, 0.4999),
            Classification::Category(EmojiCategory::RightWink)
        );
    }

    #[test]
    fn test_absent_signal() {
        for present in [0., 0.15, 0.5, 1.] {
            assert_eq!(
                classify(&signal(None, Some(present), Some(present))),
                Classification::InsufficientData
            );
            assert_eq!(
                classify(&signal(Some(present), None, Some(present))),
                Classification::InsufficientData
            );
            assert_eq!(
                classify(&signal(Some(present), Some(present), None)),
                Classification::InsufficientData
            );
        }

        assert_eq!(
            classify(&signal(Some(0.2), None, Some(0.8))),
            Classification::InsufficientData
        );
        assert_eq!(classify(&signal(None, None, None)), Classification::InsufficientData);
    }

    #[test]
    fn test_present_signals_always_classify() {
        let steps: Vec<f32> = (0..=20).map(|i| i as f32 / 20.).collect();
        for &s in steps.iter() {
            for &l in steps.iter() {
                for &r in steps.iter() {
                    let first = category(s, l, r);
                    assert!(first.category().is_some(), "({s}, {l}, {r}) was not classified");
                    assert_eq!(first, category(s, l, r));
                }
            }
        }
    }

    #[test]
    fn test_category_index() {
        for (idx, c) in EmojiCategory::ALL.iter().enumerate() {
            assert_eq!(c.index(), idx);
        }
    }
}
