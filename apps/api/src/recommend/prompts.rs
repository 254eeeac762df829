// Prompt templates for the recommendation pipeline.
// Reuses cross-cutting fragments from llm_client::prompts. Placeholders are `{name}` and are
// filled by recommend::prompt_builder.

/// Number of recommendations every recommendation prompt asks for.
pub const RECOMMENDATION_COUNT: usize = 5;

/// Assessment-based recommendations.
/// Replace: {countries}, {assessment}, {market_blocks}, {salary_formats}, {count},
///          {countries_slash}, {symbol}, {currency}, {json_only}
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"You are a professional career counselor with access to real-time job market data. Analyze this career assessment for someone interested in working in these specific countries: {countries}.

CRITICAL REQUIREMENTS:
1. ONLY recommend careers that actually exist and are in demand in the selected countries
2. Use EXACT local currency for each country (no approximations)
3. Base salary ranges on REAL market data for these specific countries
4. Consider visa/work permit requirements for international candidates
5. Factor in local job market conditions, competition, and growth prospects

ASSESSMENT ANSWERS:
{assessment}

COUNTRY-SPECIFIC MARKET DATA:
{market_blocks}

SALARY REQUIREMENTS - Use these EXACT formats:
{salary_formats}

IMPORTANT:
- Only recommend careers with genuine opportunities in the selected countries
- Use realistic salary ranges based on actual market conditions
- Consider the user's experience level and education
- Factor in language barriers and cultural fit
- Include visa/work permit considerations

Return exactly {count} career recommendations as a JSON array using these EXACT field names:
[{"id":"1","title":"Specific Job Title","match":85,"description":"Realistic description for {countries_slash} market","averageSalary":"{symbol}XX,XXX - {symbol}XXX,XXX {currency}","growthRate":"Realistic % based on market data","requiredSkills":["actual required skills"],"learningPath":["realistic learning steps"],"jobMarketDemand":"high"}]

"jobMarketDemand" must be one of "high", "medium" or "low". "match" is an integer from 0 to 100.
{json_only}"#;

/// One market block per selected country.
/// Replace: {name}, {currency}, {symbol}, {industries}, {condition}, {visa}, {languages},
///          {cost_of_living}
pub const MARKET_BLOCK_TEMPLATE: &str = "{name}:
- Currency: {currency} ({symbol})
- Major Industries: {industries}
- Job Market: {condition}
- Work Visa Required: {visa}
- Language Requirements: {languages}
- Cost of Living Index: {cost_of_living}";

/// Résumé-based recommendations. No country is known, so salaries are in USD.
/// Replace: {count}, {name}, {experience}, {skills}, {education}, {json_only}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Analyze this resume and return exactly {count} career recommendations as a JSON array.

IMPORTANT: Use USD currency for salary ranges since no specific countries were selected.

Name: {name}
Experience: {experience}
Skills: {skills}
Education: {education}

Provide salary ranges in USD format: $XX,XXX - $XXX,XXX USD

Use these EXACT field names:
[{"id":"1","title":"Career Title","match":85,"description":"Brief description","averageSalary":"$80,000 - $120,000 USD","growthRate":"+15%","requiredSkills":["skill1","skill2"],"learningPath":["step1","step2"],"jobMarketDemand":"high"}]

"jobMarketDemand" must be one of "high", "medium" or "low". "match" is an integer from 0 to 100.
{json_only}"#;

/// Skill-gap analysis against one target career.
/// Replace: {user_skills}, {title}, {required_skills}, {description}, {json_only}
pub const SKILL_GAP_PROMPT_TEMPLATE: &str = r#"Analyze the skill gap between the user's current skills and the requirements for their target career.

User's Current Skills: {user_skills}

Target Career: {title}
Required Skills: {required_skills}
Career Description: {description}

Return a JSON array of skill gaps, each with this structure:
{
  "skill": "Skill Name",
  "currentLevel": 2,
  "requiredLevel": 4,
  "priority": "high",
  "resources": ["resource1", "resource2", "resource3"]
}

Consider:
- Skills the user already has vs. what's required
- Priority ("high", "medium" or "low") based on importance for the role
- Realistic learning resources and courses
- Current skill level (1-5 scale)
- Required skill level for the target role (1-5 scale)

{json_only}"#;

/// Free-text résumé extraction. Replace: {resume_text}, {json_only}
pub const RESUME_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract structured data from this resume text as a single JSON object:

{resume_text}

Use this EXACT shape, leaving unknown fields empty:
{"name":"","email":"","phone":"","summary":"","experience":[{"title":"","company":"","duration":"","description":""}],"skills":[],"education":[{"degree":"","field":"","institution":"","year":""}]}

{json_only}"#;
