//! Prompt skeletons for the home-office deduction domain.

/// Expands a core fact into story facts and an entailment rule.
pub const FACT_EXPANSION_PROMPT: &str = r#"
The core fact is '{fact}'. Think of story facts that would imply this fact and
give me a tax rule or commonsense rule that explains the entailment.
{rules}
Keep in mind that these are the story facts so far:
{story_facts}
Make sure that your story facts are consistent with each other and with the core fact.
Only output one set of story facts and rule. Keep the same format as in the examples below.
New story facts should add value to the story and not be redundant with existing story facts.
If you cannot think of any more story facts that add value to the story, just return an empty list.

Here is an example:
Fact: "The home office is the center of professional activity."
Story Fact: "The home office is a separate room."
Story Fact: "The narrator does not have another office."
Rule: "A home office is the center of professional activity if the majority of professional activities are carried out in the home office."

Now you try:
Fact: "{fact}"
"#;

/// Writes the narrative chapter from a set of story facts.
pub const NARRATIVE_PROMPT: &str = r#"
Write a first-person mini story about a person's working situation at home in Germany given a list of facts.
Keep the story coherent and realistic and avoid tax jargon. Only output the story without any additional commentary.
The story must clearly imply the following facts without stating them like a list:

{facts_list}

Critical constraints:
- Never mention terms like center of professional activity.
- Never explain how taxes work or are calculated.
"#;
