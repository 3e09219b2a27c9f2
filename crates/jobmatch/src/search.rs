//! Query-side helpers: pagination and the job/company search filters.
//!
//! Matching is plain case-insensitive substring comparison; the recommended
//! feed is the same keyword filter driven by the seeker's profile, not a
//! ranking algorithm.

use serde::{Deserialize, Serialize};

use crate::domain::{CompanyRecord, JobRecord, JobStatus, UserRecord};
use crate::store::{CompanyStore, JobStore, StoreError};

/// Page selector with the original's defaults (page 1, 10 per page).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// Clamp degenerate values instead of erroring; page 0 reads as page 1.
    fn normalized(self) -> (usize, usize) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }

    pub fn slice<T>(self, items: Vec<T>) -> Page<T> {
        let (page, limit) = self.normalized();
        let total_items = items.len();
        let total_pages = total_items.div_ceil(limit).max(1);
        let data = items
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Page {
            data,
            pagination: PageInfo {
                current_page: page,
                total_pages,
                total_items,
                limit,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Filters for the public job search. All optional; an empty query returns
/// every open job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSearchQuery {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<u64>,
    pub category: Option<String>,
    pub experience_level: Option<String>,
}

impl JobSearchQuery {
    fn matches(&self, job: &JobRecord) -> bool {
        if job.draft.status != JobStatus::Open {
            return false;
        }

        if let Some(keyword) = &self.keyword {
            let hit = contains_ci(&job.draft.title, keyword)
                || contains_ci(&job.draft.description, keyword)
                || job.draft.skills.iter().any(|s| contains_ci(s, keyword));
            if !hit {
                return false;
            }
        }

        if let Some(location) = &self.location {
            let city = job.draft.location.city.as_deref().unwrap_or_default();
            if !contains_ci(city, location) {
                return false;
            }
        }

        if let Some(job_type) = &self.job_type {
            if !serde_variant_eq(&job.draft.job_type, job_type) {
                return false;
            }
        }

        if let Some(salary_min) = self.salary_min {
            if job.draft.salary.min.unwrap_or(0) < salary_min {
                return false;
            }
        }

        if let Some(category) = &self.category {
            let job_category = job.draft.category.as_deref().unwrap_or_default();
            if !job_category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(level) = &self.experience_level {
            match &job.draft.experience_level {
                Some(actual) if serde_variant_eq(actual, level) => {}
                _ => return false,
            }
        }

        true
    }
}

fn serde_variant_eq<T: Serialize>(value: &T, raw: &str) -> bool {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(|s| s.eq_ignore_ascii_case(raw)))
        .unwrap_or(false)
}

pub fn search_jobs<S: JobStore>(
    store: &S,
    query: &JobSearchQuery,
    page: Pagination,
) -> Result<Page<JobRecord>, StoreError> {
    let matches: Vec<_> = store
        .jobs()?
        .into_iter()
        .filter(|job| query.matches(job))
        .collect();
    Ok(page.slice(matches))
}

/// Open jobs matching any of the seeker's skills or desired location, by
/// the same substring filter as search. A profile with no criteria gets
/// every open job.
pub fn recommended_jobs<S: JobStore>(
    store: &S,
    seeker: &UserRecord,
    page: Pagination,
) -> Result<Page<JobRecord>, StoreError> {
    let matches: Vec<_> = store
        .jobs()?
        .into_iter()
        .filter(|job| job.draft.status == JobStatus::Open)
        .filter(|job| {
            if seeker.skills.is_empty() && seeker.location.is_none() {
                return true;
            }
            let skill_hit = seeker.skills.iter().any(|skill| {
                contains_ci(&job.draft.title, skill)
                    || job.draft.skills.iter().any(|s| contains_ci(s, skill))
            });
            let location_hit = seeker.location.as_deref().is_some_and(|location| {
                let city = job.draft.location.city.as_deref().unwrap_or_default();
                contains_ci(city, location)
            });
            skill_hit || location_hit
        })
        .collect();
    Ok(page.slice(matches))
}

/// Filters for the public company directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanySearchQuery {
    pub name: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
}

pub fn search_companies<S: CompanyStore>(
    store: &S,
    query: &CompanySearchQuery,
    page: Pagination,
) -> Result<Page<CompanyRecord>, StoreError> {
    let mut matches: Vec<_> = store
        .companies()?
        .into_iter()
        .filter(|company| {
            let name_hit = query
                .name
                .as_deref()
                .is_none_or(|name| contains_ci(&company.profile.name, name));
            let location_hit = query.location.as_deref().is_none_or(|location| {
                let city = company.profile.city.as_deref().unwrap_or_default();
                contains_ci(city, location)
            });
            let industry_hit = query.industry.as_deref().is_none_or(|industry| {
                let actual = company.profile.industry.as_deref().unwrap_or_default();
                contains_ci(actual, industry)
            });
            name_hit && location_hit && industry_hit
        })
        .collect();

    // Busiest companies first, matching the original's sort order.
    matches.sort_by(|a, b| {
        b.total_jobs
            .cmp(&a.total_jobs)
            .then(b.total_followers.cmp(&a.total_followers))
            .then(b.created_at.cmp(&a.created_at))
    });

    Ok(page.slice(matches))
}
