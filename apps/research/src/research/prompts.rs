// Prompt text for the four report kinds and claim verification.
// Each template is split around its runtime inputs; `requests.rs` stitches the
// pieces together with `format!`, so a missing input is a compile error rather
// than a silently unreplaced placeholder.

/// Gap analysis: text placed before the specification content.
pub const GAP_ANALYSIS_INTRO: &str = "\
You are an expert system analyst specializing in comprehensive specification analysis.

TASK: Perform deep gap analysis of the platform specification.

SPECIFICATION COMPONENTS TO ANALYZE:";

/// Gap analysis: requirements and output schema after the specification content.
pub const GAP_ANALYSIS_OUTPUT: &str = r#"ANALYSIS REQUIREMENTS:
1. Identify missing functional requirements
2. Assess technical architecture completeness
3. Evaluate cultural intelligence framework coverage
4. Analyze market validation thoroughness
5. Review implementation readiness

Provide comprehensive analysis in JSON format:
{
    "missing_components": ["component1", "component2"],
    "enhancement_opportunities": ["opportunity1", "opportunity2"],
    "technical_gaps": ["gap1", "gap2"],
    "cultural_intelligence_gaps": ["gap1", "gap2"],
    "market_validation_needs": ["need1", "need2"],
    "implementation_blockers": ["blocker1", "blocker2"],
    "priority_recommendations": ["rec1", "rec2"],
    "estimated_effort": "hours/days/weeks",
    "confidence_score": 0-100
}"#;

pub const MARKET_INTELLIGENCE_INTRO: &str = "\
You are a market intelligence expert specializing in global tech hiring trends.

TASK: Conduct market research for cultural intelligence in tech hiring.";

pub const MARKET_INTELLIGENCE_OUTPUT: &str = r#"RESEARCH REQUIREMENTS:
1. Market size and growth projections
2. Competitive positioning analysis
3. Cultural hiring trend analysis
4. Technology adoption patterns
5. Regulatory environment assessment

Provide market intelligence in JSON format:
{
    "market_size": {"total": "value", "growth_rate": "percentage"},
    "competitive_analysis": {"strengths": [], "weaknesses": [], "opportunities": []},
    "cultural_trends": ["trend1", "trend2"],
    "technology_adoption": {"emerging": [], "mature": [], "declining": []},
    "regulatory_considerations": ["consideration1", "consideration2"],
    "market_opportunities": ["opportunity1", "opportunity2"],
    "entry_barriers": ["barrier1", "barrier2"],
    "success_factors": ["factor1", "factor2"]
}"#;

pub const TECHNICAL_VALIDATION_INTRO: &str = "\
You are a senior technical architect specializing in AI-powered platforms.

TASK: Validate the technical architecture and implementation strategy.";

pub const TECHNICAL_VALIDATION_OUTPUT: &str = r#"VALIDATION REQUIREMENTS:
1. Architecture scalability assessment
2. API integration feasibility
3. Performance optimization opportunities
4. Security and compliance validation
5. Implementation complexity analysis

Provide technical validation in JSON format:
{
    "architecture_assessment": {"scalability": "rating", "maintainability": "rating"},
    "api_integration_feasibility": {"integration": "feasible/challenging"},
    "performance_optimization": ["optimization1", "optimization2"],
    "security_considerations": ["consideration1", "consideration2"],
    "implementation_complexity": "low/medium/high",
    "resource_requirements": {"development": "estimate", "infrastructure": "estimate"},
    "risk_factors": ["risk1", "risk2"],
    "mitigation_strategies": ["strategy1", "strategy2"]
}"#;

pub const CULTURAL_INTELLIGENCE_INTRO: &str = "\
You are a cultural intelligence expert with deep knowledge of global workplace cultures.

TASK: Conduct cultural intelligence research for global tech hiring.";

pub const CULTURAL_INTELLIGENCE_OUTPUT: &str = r#"RESEARCH REQUIREMENTS:
1. Cultural dimension analysis for each market
2. Communication style patterns
3. Professional etiquette variations
4. Bias identification and mitigation strategies
5. Cross-cultural team integration best practices

Provide cultural intelligence research in JSON format:
{
    "cultural_profiles": {
        "market": {
            "communication_style": "description",
            "hierarchy_preference": "description",
            "decision_making": "description",
            "feedback_culture": "description",
            "work_life_balance": "description"
        }
    },
    "bias_mitigation_strategies": ["strategy1", "strategy2"],
    "integration_best_practices": ["practice1", "practice2"],
    "cultural_adaptation_indicators": ["indicator1", "indicator2"],
    "success_metrics": ["metric1", "metric2"]
}"#;

/// Claim verification: text placed before the quoted claim.
pub const CLAIM_VERIFICATION_INTRO: &str = "\
Please verify the following claim and provide a confidence score (0-100) \
and a brief explanation.";

pub const CLAIM_VERIFICATION_OUTPUT: &str = r#"Respond in JSON format:
{
    "confidence_score": 0-100,
    "explanation": "brief explanation"
}"#;
