use crate::data::{GenerateRequest, Requirement};
use crate::error::{EngineError, RequirementFault};

const MAX_TEACHERS: usize = 2;

/// Rejects malformed input before any placement happens.
pub fn validate_request(request: &GenerateRequest) -> Result<(), EngineError> {
    for (index, requirement) in request.requirements.iter().enumerate() {
        check_requirement(requirement).map_err(|fault| EngineError::InvalidRequirement {
            index,
            subject: requirement.subject.clone(),
            fault,
        })?;
    }

    let options = &request.day_options;
    if request.year_level.is_senior() && options.use_custom_days && options.custom_days.is_empty() {
        return Err(EngineError::EmptyCustomDays);
    }

    if request.free_categories.iter().all(|c| c.trim().is_empty()) {
        return Err(EngineError::NoFreeCategories);
    }

    Ok(())
}

fn check_requirement(requirement: &Requirement) -> Result<(), RequirementFault> {
    if requirement.subject.trim().is_empty() {
        return Err(RequirementFault::EmptySubject);
    }
    if requirement.teachers.is_empty() {
        return Err(RequirementFault::MissingTeacher);
    }
    if requirement.teachers.iter().any(|t| t.trim().is_empty()) {
        return Err(RequirementFault::BlankTeacher);
    }
    if requirement.teachers.len() > MAX_TEACHERS {
        return Err(RequirementFault::TooManyTeachers(requirement.teachers.len()));
    }
    if !requirement.is_lab && requirement.batch.is_some() {
        return Err(RequirementFault::BatchWithoutLab);
    }
    Ok(())
}
