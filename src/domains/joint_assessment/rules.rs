//! Rule corpus for the joint-assessment domain.
//!
//! Static, ordered, supplied verbatim into expansion prompts; never
//! generated or mutated by the pipeline.

pub const TAX_RULES: &[&str] = &[
    "Couples are eligible for joint assessment if they that are married to each other in the assessment year, are both subject to unlimited tax liability, and live together for at least one day",
    "If either spouse is subject to limited tax liability, they are not eligible for joint assessment",
    "A person is subject to unlimited tax liability if they reside in Germany",
    "Joint assessment is often more beneficial for couples where one spouse has a significantly higher income than the other",
    "For joint assessment, the combined income of both spouses is calculated and then halved to determine the tax rate, which is then applied to the total income",
    "Income tax brackets are progressive, meaning higher income is taxed at higher rates",
    "Certain deductions and allowances can reduce taxable income, such as for children, special expenses, and extraordinary burdens",
    "Each child entitles the parents to a child allowance, which reduces their taxable income",
    "Wage replacement benefits are tax-free, but they affect the tax rate applied to other income",
    "Extraordinary expenses can be deducted if they exceed a certain percentage of the taxpayer's income",
    "Church tax is calculated based on the income tax amount",
    "For couples with mixed religion, church tax is calculated separately for each spouse",
    "For couples where only one spouse is subject to church tax and earns significantly less than the other, it may be beneficial to file separately due to the specific church tax calculation",
    "Parents can take a total amount of 14 months of parental time off, but only a maximum of 12 months can be taken by one parent",
    "Parental benefits are calculated based on the average monthly income and capped to a maximum amount of 1800 euros per month",
];
