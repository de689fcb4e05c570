//////////////////////////////////////////////////////////////////
// companies
//////////////////////////////////////////////////////////////////

/// `esg_database.companies` holds one row per observed (company, score) pair; repeated
/// observations are kept, there is no conflict target.
pub(crate) static INSERT_COMPANY: &str = "
    INSERT INTO esg_database.companies (name, esg_score)
    VALUES ($1, $2)
";

/// Highest scores first, capped at `$1` rows.
pub(crate) static SELECT_TOP: &str = "
    SELECT name, esg_score
    FROM esg_database.companies
    ORDER BY esg_score DESC
    LIMIT $1
";
