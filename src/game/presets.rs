use clap::ValueEnum;

use super::request::build_request;
use super::wire::DeviationRequest;

/// Classic two-player teaching games, described by their payoff tables only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    PrisonersDilemma,
    StagHunt,
    MatchingPennies,
    BattleOfTheSexes,
}

impl Preset {
    pub fn label(self) -> &'static str {
        match self {
            Self::PrisonersDilemma => "Prisoner's dilemma",
            Self::StagHunt => "Stag hunt",
            Self::MatchingPennies => "Matching pennies",
            Self::BattleOfTheSexes => "Battle of the sexes",
        }
    }

    pub fn request(self) -> DeviationRequest {
        match self {
            // T=5, R=3, P=1, S=0
            Self::PrisonersDilemma => build_request(
                &[&["C", "D"], &["C", "D"]],
                &[
                    (&["C", "C"], &[3.0, 3.0]),
                    (&["C", "D"], &[0.0, 5.0]),
                    (&["D", "C"], &[5.0, 0.0]),
                    (&["D", "D"], &[1.0, 1.0]),
                ],
            ),
            Self::StagHunt => build_request(
                &[&["Stag", "Hare"], &["Stag", "Hare"]],
                &[
                    (&["Stag", "Stag"], &[4.0, 4.0]),
                    (&["Stag", "Hare"], &[0.0, 3.0]),
                    (&["Hare", "Stag"], &[3.0, 0.0]),
                    (&["Hare", "Hare"], &[3.0, 3.0]),
                ],
            ),
            Self::MatchingPennies => build_request(
                &[&["H", "T"], &["H", "T"]],
                &[
                    (&["H", "H"], &[1.0, -1.0]),
                    (&["H", "T"], &[-1.0, 1.0]),
                    (&["T", "H"], &[-1.0, 1.0]),
                    (&["T", "T"], &[1.0, -1.0]),
                ],
            ),
            Self::BattleOfTheSexes => build_request(
                &[&["Opera", "Football"], &["Opera", "Football"]],
                &[
                    (&["Opera", "Opera"], &[3.0, 2.0]),
                    (&["Opera", "Football"], &[0.0, 0.0]),
                    (&["Football", "Opera"], &[0.0, 0.0]),
                    (&["Football", "Football"], &[2.0, 3.0]),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::request::validate_request;

    #[test]
    fn every_preset_is_a_valid_request() {
        for preset in Preset::value_variants() {
            let request = preset.request();
            assert!(
                validate_request(&request).is_ok(),
                "{} failed validation",
                preset.label()
            );
            assert_eq!(request.payoff_matrix.len(), 4);
        }
    }

    #[test]
    fn prisoners_dilemma_uses_standard_payoffs() {
        let request = Preset::PrisonersDilemma.request();
        assert_eq!(request.payoff_matrix["C,D"], vec![0.0, 5.0]);
        assert_eq!(request.payoff_matrix["D,D"], vec![1.0, 1.0]);
        assert_eq!(request.player_actions["1"], vec!["C", "D"]);
    }
}
