//! Rule corpus for the home-office deduction domain.

pub const TAX_RULES: &[&str] = &[
    "Under German tax law, costs for a home office can be deducted if the home office is the center of the entire professional activity or if no other workplace is available for professional use.",
    "The home office is the center of professional activity if the majority of professional activities are carried out in the home office.",
    "Deductible costs for a home office are calculated on a pro-rata basis (e.g., based on square meters).",
    "Instead of exact costs, it is possible to claim a flat rate of 1,260 EUR per year for the home office.",
    "A home office has to be a separate room that is used almost exclusively for professional purposes.",
    "A working corner in a living room or bedroom is generally not considered a home office for tax deduction purposes.",
    "If the working space at home does not qualify as a home office, the home office flat rate can be claimed up to 1,260 EUR per year (6 EUR per day).",
];
