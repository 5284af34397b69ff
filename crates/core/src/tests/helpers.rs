// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use case_survey_audit::{Actor, Cause};
use case_survey_domain::{
    Case, CaseId, CaseKey, LifecycleState, Permission, SharePointDirectory, VersionToken,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("case-survey-pipeline"), String::from("service"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(
        String::from("0b6f6c4e-2f43-4bde-9a0c-3c1f4b1f2a10"),
        String::from("Pipeline message"),
    )
}

pub fn create_test_directory() -> SharePointDirectory {
    SharePointDirectory::new("f1", "d1")
}

pub fn create_test_case(state: LifecycleState) -> Case {
    let mut case: Case = Case::new(CaseId::new("case-1"), CaseKey::new("C-100"));
    case.lifecycle_state = state;
    case.version_token = Some(VersionToken::new(10, "etag-10"));
    case.manager_employee_code = Some(String::from("E1"));
    case.case_name = Some(String::from("Acme diligence"));
    case.permissions = vec![Permission {
        employee_code: String::from("E2"),
        role: String::from("Reader"),
    }];
    if state != LifecycleState::New {
        case.share_point_directory = Some(create_test_directory());
    }
    case
}
