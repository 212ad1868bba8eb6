//! Joint vs. individual assessment: adjustments, totals, and the comparator.
//!
//! All computations are pure functions of a [`CoupleInput`] and a
//! [`Tariff`]; the comparator runs both filing modes and recommends the
//! cheaper one, with ties resolving to joint.

use serde::{Deserialize, Serialize};

use crate::schema::{CoupleInput, Person};

use super::levy::special_church_levy;
use super::tariff::Tariff;

/// A member partner whose share of the couple's combined adjusted income is
/// below this fraction triggers the special levy override.
const LEVY_SHARE_CUTOFF: f64 = 0.35;

/// Which filing mode minimizes the couple's total liability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Joint,
    Individual,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Joint => "joint",
            Recommendation::Individual => "individual",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing both filing modes. Derived, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub individual_total: f64,
    pub joint_total: f64,
    /// individual − joint; positive means joint assessment saves that amount.
    pub advantage: f64,
    pub recommendation: Recommendation,
}

/// Income tax for a single person under the given schedule.
pub fn single_assessment(taxable_income: f64, tariff: &dyn Tariff) -> f64 {
    tariff.liability(taxable_income.max(0.0))
}

/// Income tax for a couple under the splitting method: the combined income
/// is halved for the rate lookup and the resulting liability doubled.
pub fn joint_assessment(taxable_income: f64, tariff: &dyn Tariff) -> f64 {
    let half = taxable_income.max(0.0) / 2.0;
    2.0 * tariff.liability(half)
}

/// Effective rate once tax-free wage replacement is pulled into the bracket
/// lookup (Progressionsvorbehalt).
///
/// The replacement income itself stays untaxed; the caller applies the
/// returned rate to the taxable portion only. Taxing the taxable portion
/// directly at its own bracket does not reproduce this.
pub fn progression_rate(
    taxable_income: f64,
    wage_replacement: f64,
    joint: bool,
    tariff: &dyn Tariff,
) -> f64 {
    let base_plus = taxable_income.max(0.0) + wage_replacement.max(0.0);
    if base_plus <= 0.0 {
        return 0.0;
    }
    let tax_with_progression = if joint {
        joint_assessment(base_plus, tariff)
    } else {
        single_assessment(base_plus, tariff)
    };
    tax_with_progression / base_plus
}

/// Taxable income after deducting medical costs above the income-dependent
/// threshold (extraordinary burden, per person, before any splitting).
pub fn taxable_income_after_medical(person: &Person) -> f64 {
    let income = person.income.max(0.0);
    let medical = person.medical_costs.max(0.0);

    // Thresholds for 2025.
    let threshold = if income <= 15_340.0 {
        0.05 * income
    } else if income <= 51_130.0 {
        0.06 * income
    } else {
        0.07 * income
    };

    let deductible = (medical - threshold).max(0.0);
    (income - deductible).max(0.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Total liability (income tax plus church charges) under joint assessment.
pub fn compute_joint_total(params: &CoupleInput, tariff: &dyn Tariff) -> f64 {
    let ta = taxable_income_after_medical(&params.a);
    let tb = taxable_income_after_medical(&params.b);
    let taxable_total = ta + tb;

    let replacement_total =
        params.a.wage_replacement.max(0.0) + params.b.wage_replacement.max(0.0);

    // Income tax under splitting with Progressionsvorbehalt.
    let rate = progression_rate(taxable_total, replacement_total, true, tariff);
    let base_total = rate * taxable_total;

    // Allocate the base tax proportionally for the church charge.
    let (share_a, share_b) = if taxable_total > 0.0 {
        (ta / taxable_total, tb / taxable_total)
    } else {
        (0.0, 0.0)
    };

    let alloc_a = base_total * share_a;
    let alloc_b = base_total * share_b;

    let mut church_a = if params.a.pays_church_tax {
        alloc_a * params.church_tax_rate
    } else {
        0.0
    };
    let mut church_b = if params.b.pays_church_tax {
        alloc_b * params.church_tax_rate
    } else {
        0.0
    };

    // The special levy replaces the allocated charge only when exactly one
    // partner is a member and that partner's income share is below the
    // cutoff; it is computed on the couple's full taxable income.
    if params.a.pays_church_tax != params.b.pays_church_tax {
        if params.a.pays_church_tax && share_a < LEVY_SHARE_CUTOFF {
            church_a = church_a.max(special_church_levy(taxable_total));
        } else if params.b.pays_church_tax && share_b < LEVY_SHARE_CUTOFF {
            church_b = church_b.max(special_church_levy(taxable_total));
        }
    }

    round2(base_total + church_a + church_b)
}

/// Total liability (income tax plus church charges) under individual
/// assessment: each partner computed independently, no allocation and no
/// levy override.
pub fn compute_individual_total(params: &CoupleInput, tariff: &dyn Tariff) -> f64 {
    // Partner A
    let ta = taxable_income_after_medical(&params.a);
    let rate_a = progression_rate(ta, params.a.wage_replacement, false, tariff);
    let base_a = rate_a * ta;
    let church_a = if params.a.pays_church_tax {
        base_a * params.church_tax_rate
    } else {
        0.0
    };

    // Partner B
    let tb = taxable_income_after_medical(&params.b);
    let rate_b = progression_rate(tb, params.b.wage_replacement, false, tariff);
    let base_b = rate_b * tb;
    let church_b = if params.b.pays_church_tax {
        base_b * params.church_tax_rate
    } else {
        0.0
    };

    round2(base_a + church_a + base_b + church_b)
}

/// Run both filing modes and recommend the cheaper one.
///
/// Ties resolve to joint — explicitly, not incidentally.
pub fn compare_assessments(params: &CoupleInput, tariff: &dyn Tariff) -> AssessmentResult {
    let joint_total = compute_joint_total(params, tariff);
    let individual_total = compute_individual_total(params, tariff);

    let advantage = round2(individual_total - joint_total);
    let recommendation = if joint_total < individual_total {
        Recommendation::Joint
    } else if individual_total < joint_total {
        Recommendation::Individual
    } else {
        Recommendation::Joint
    };

    AssessmentResult {
        individual_total,
        joint_total,
        advantage,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use crate::tax::tariff::Tariff2025;

    use super::*;

    fn person(income: f64) -> Person {
        Person {
            income,
            ..Person::default()
        }
    }

    #[test]
    fn splitting_invariant() {
        // joint(x) == 2 * tariff(x/2), exactly, for a sweep of incomes.
        for x in [0.0, 10_000.0, 24_192.0, 50_001.0, 140_000.0, 600_000.0] {
            assert_eq!(
                joint_assessment(x, &Tariff2025),
                2.0 * Tariff2025.liability(x / 2.0),
                "splitting mismatch at {x}"
            );
        }
    }

    #[test]
    fn progression_rate_zero_base() {
        assert_eq!(progression_rate(0.0, 0.0, false, &Tariff2025), 0.0);
        assert_eq!(progression_rate(-10.0, -10.0, true, &Tariff2025), 0.0);
    }

    #[test]
    fn progression_rate_raises_rate_not_base() {
        // 30k taxable + 20k replacement: the rate is looked up at 50k, but
        // the charged liability is rate * 30k — strictly between the tax on
        // 30k and the tax on 50k.
        let tariff = Tariff2025;
        let rate = progression_rate(30_000.0, 20_000.0, false, &tariff);
        let charged = rate * 30_000.0;
        assert!(charged > tariff.liability(30_000.0));
        assert!(charged < tariff.liability(50_000.0));
    }

    #[test]
    fn medical_thresholds_by_income_band() {
        // 5% band
        let p = Person {
            income: 10_000.0,
            medical_costs: 1_000.0,
            ..Person::default()
        };
        assert_eq!(taxable_income_after_medical(&p), 10_000.0 - 500.0);

        // 6% band
        let p = Person {
            income: 40_000.0,
            medical_costs: 3_000.0,
            ..Person::default()
        };
        assert_eq!(taxable_income_after_medical(&p), 40_000.0 - 600.0);

        // 7% band
        let p = Person {
            income: 80_000.0,
            medical_costs: 6_000.0,
            ..Person::default()
        };
        assert_eq!(taxable_income_after_medical(&p), 80_000.0 - 400.0);
    }

    #[test]
    fn medical_below_threshold_deducts_nothing() {
        let p = Person {
            income: 40_000.0,
            medical_costs: 2_000.0,
            ..Person::default()
        };
        assert_eq!(taxable_income_after_medical(&p), 40_000.0);
    }

    #[test]
    fn negative_inputs_clamp_to_zero() {
        let p = Person {
            income: -5_000.0,
            medical_costs: -100.0,
            ..Person::default()
        };
        assert_eq!(taxable_income_after_medical(&p), 0.0);
    }

    #[test]
    fn tie_breaks_to_joint() {
        // Symmetric zero couple: both totals are exactly zero.
        let couple = CoupleInput::default();
        let result = compare_assessments(&couple, &Tariff2025);
        assert_eq!(result.joint_total, result.individual_total);
        assert_eq!(result.advantage, 0.0);
        assert_eq!(result.recommendation, Recommendation::Joint);
    }

    #[test]
    fn levy_applies_only_to_single_low_share_member() {
        // Sole earner B is not the member; member A has no income, so A's
        // share is 0 < 0.35 and A's charge becomes the table amount.
        let couple = CoupleInput {
            a: Person {
                pays_church_tax: true,
                ..person(0.0)
            },
            b: person(100_000.0),
            ..CoupleInput::default()
        };
        let with_levy = compute_joint_total(&couple, &Tariff2025);

        let no_member = CoupleInput {
            a: person(0.0),
            b: person(100_000.0),
            ..CoupleInput::default()
        };
        let without = compute_joint_total(&no_member, &Tariff2025);

        assert_eq!(with_levy - without, special_church_levy(100_000.0));
    }

    #[test]
    fn levy_never_applies_when_both_members() {
        // Both members: each pays the allocated charge, no table override,
        // even though A's share is below the cutoff.
        let couple = CoupleInput {
            a: Person {
                pays_church_tax: true,
                ..person(0.0)
            },
            b: Person {
                pays_church_tax: true,
                ..person(100_000.0)
            },
            ..CoupleInput::default()
        };
        let both = compute_joint_total(&couple, &Tariff2025);

        // A's allocated share is zero, so the total must equal the
        // single-member-B variant (B pays on the full allocation).
        let only_b = CoupleInput {
            a: person(0.0),
            b: Person {
                pays_church_tax: true,
                ..person(100_000.0)
            },
            ..CoupleInput::default()
        };
        assert_eq!(both, compute_joint_total(&only_b, &Tariff2025));
    }

    #[test]
    fn levy_skipped_when_member_share_is_high() {
        // Member A earns 40% of the combined income — above the cutoff, so
        // only the proportional charge applies.
        let couple = CoupleInput {
            a: Person {
                pays_church_tax: true,
                ..person(40_000.0)
            },
            b: person(60_000.0),
            ..CoupleInput::default()
        };
        let total = compute_joint_total(&couple, &Tariff2025);

        // Reconstruct the expected proportional charge.
        let ta = taxable_income_after_medical(&couple.a);
        let tb = taxable_income_after_medical(&couple.b);
        let rate = progression_rate(ta + tb, 0.0, true, &Tariff2025);
        let base = rate * (ta + tb);
        let expected = base + base * (ta / (ta + tb)) * 0.09;
        assert!((total - expected).abs() < 0.01);
    }

    #[test]
    fn individual_total_ignores_levy_and_allocation() {
        // Individually, the zero-income member owes nothing regardless of
        // the partner's income.
        let couple = CoupleInput {
            a: Person {
                pays_church_tax: true,
                ..person(0.0)
            },
            b: person(100_000.0),
            ..CoupleInput::default()
        };
        let individual = compute_individual_total(&couple, &Tariff2025);
        let solo_b = compute_individual_total(
            &CoupleInput {
                a: person(0.0),
                b: person(100_000.0),
                ..CoupleInput::default()
            },
            &Tariff2025,
        );
        assert_eq!(individual, solo_b);
    }

    #[test]
    fn high_imbalance_prefers_joint() {
        let couple = CoupleInput {
            a: person(95_000.0),
            b: person(22_000.0),
            ..CoupleInput::default()
        };
        let result = compare_assessments(&couple, &Tariff2025);
        assert_eq!(result.recommendation, Recommendation::Joint);
        assert!(result.advantage > 0.0);
    }
}
