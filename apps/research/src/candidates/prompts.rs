// Candidate analysis prompts. Each is rendered with the candidate's full row
// as compact JSON.

pub const CULTURAL_FIT_INTRO: &str =
    "Analyze the cultural fit of this candidate for global tech hiring:";

pub const CULTURAL_FIT_OUTPUT: &str = r#"Provide analysis in JSON format:
{
    "cultural_score": 0-100,
    "communication_style": "direct/diplomatic/balanced",
    "adaptation_potential": "high/medium/low",
    "market_preferences": ["market1", "market2"],
    "strengths": ["strength1", "strength2"],
    "development_areas": ["area1", "area2"]
}"#;

pub const TECHNICAL_SKILLS_INTRO: &str = "Analyze the technical skills of this candidate:";

pub const TECHNICAL_SKILLS_OUTPUT: &str = r#"Provide analysis in JSON format:
{
    "technical_score": 0-100,
    "skill_proficiency": {"skill": "level"},
    "experience_level": "junior/mid/senior",
    "learning_potential": "high/medium/low",
    "technical_strengths": ["strength1", "strength2"],
    "skill_gaps": ["gap1", "gap2"]
}"#;

pub fn cultural_fit_prompt(profile_json: &str) -> String {
    format!("{CULTURAL_FIT_INTRO}\n\nCandidate Profile: {profile_json}\n\n{CULTURAL_FIT_OUTPUT}")
}

pub fn technical_skills_prompt(profile_json: &str) -> String {
    format!(
        "{TECHNICAL_SKILLS_INTRO}\n\nCandidate Profile: {profile_json}\n\n{TECHNICAL_SKILLS_OUTPUT}"
    )
}
