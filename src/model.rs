// Funcionarios API
// Copyright 2025 The Funcionarios API Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! High-level data types and their validation rules.

use derive_getters::Getters;
use derive_more::Constructor;
use serde::{de::Visitor, Deserialize, Serialize};

/// Minimum length of an employee name, counted after trimming.
pub(crate) const MIN_NAME_LENGTH: usize = 3;

/// Minimum length of a role, counted after trimming.
pub(crate) const MIN_ROLE_LENGTH: usize = 2;

/// Page number used when a listing request does not supply one.
pub(crate) const DEFAULT_PAGE: i64 = 1;

/// Page size used when a listing request does not supply one.
pub(crate) const DEFAULT_LIMIT: i64 = 10;

/// Largest page size a listing request can ask for.
pub(crate) const MAX_LIMIT: i64 = 100;

/// Indicates a problem processing the data of an entity.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ModelError(pub(crate) String);

/// Result type for this module.
pub(crate) type ModelResult<T> = Result<T, ModelError>;

/// Identifier of an employee, assigned by the datastore on creation.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct EmployeeId(i64);

impl EmployeeId {
    /// Creates an id from a datastore-assigned value, which must be positive.
    pub(crate) fn new(id: i64) -> ModelResult<Self> {
        if id <= 0 {
            return Err(ModelError(format!("Employee id must be positive but got {}", id)));
        }
        Ok(Self(id))
    }

    /// Parses an id from an untrusted path parameter.
    ///
    /// Any integer is well-formed at this point: ids that cannot have been
    /// assigned (zero, negatives) simply fail the subsequent lookup.
    pub(crate) fn parse(raw: &str) -> ModelResult<Self> {
        match raw.parse::<i64>() {
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(ModelError(format!("Id '{}' is not an integer", raw))),
        }
    }

    /// Returns the id as the `i64` the datastore uses.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Represents a valid employee name: non-empty and with a minimum length once
/// leading and trailing whitespace is removed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct EmployeeName(String);

impl EmployeeName {
    /// Creates a new name from an untrusted string `s`, trimming it and making
    /// sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        let s = s.trim();
        if s.chars().count() < MIN_NAME_LENGTH {
            return Err(ModelError(format!(
                "Name must have at least {} characters",
                MIN_NAME_LENGTH
            )));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns a string view of the name.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A deserialization visitor for an `EmployeeName`.
struct EmployeeNameVisitor;

impl Visitor<'_> for EmployeeNameVisitor {
    type Value = EmployeeName;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        EmployeeName::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for EmployeeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(EmployeeNameVisitor)
    }
}

/// Represents a valid role (job title): non-empty and with a minimum length
/// once leading and trailing whitespace is removed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct Role(String);

impl Role {
    /// Creates a new role from an untrusted string `s`, trimming it and making
    /// sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        let s = s.trim();
        if s.chars().count() < MIN_ROLE_LENGTH {
            return Err(ModelError(format!(
                "Role must have at least {} characters",
                MIN_ROLE_LENGTH
            )));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns a string view of the role.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A deserialization visitor for a `Role`.
struct RoleVisitor;

impl Visitor<'_> for RoleVisitor {
    type Value = Role;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Role::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(RoleVisitor)
    }
}

/// Represents a valid salary: a finite, non-negative number.
///
/// Stored with double precision; any display rounding is a client concern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct Salary(f64);

impl Salary {
    /// Creates a new salary from an untrusted number, making sure it is valid.
    pub(crate) fn new(value: f64) -> ModelResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(ModelError("Salary must be a non-negative number".to_owned()));
        }
        Ok(Self(value))
    }

    /// Returns the salary as the `f64` the datastore uses.
    pub(crate) fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A deserialization visitor for a `Salary`.
struct SalaryVisitor;

impl Visitor<'_> for SalaryVisitor {
    type Value = Salary;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a non-negative number")
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Salary::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_f64(v as f64)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        self.visit_f64(v as f64)
    }
}

impl<'de> Deserialize<'de> for Salary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_f64(SalaryVisitor)
    }
}

/// An employee record as persisted in the datastore.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct Employee {
    /// The datastore-assigned identifier of the record.
    id: EmployeeId,

    /// The employee's full name.
    name: EmployeeName,

    /// The employee's job title.
    role: Role,

    /// The employee's monthly salary.
    salary: Salary,
}

/// The validated, writable fields of an employee, as carried by a create or
/// an update operation.
#[derive(Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct EmployeeData {
    /// The employee's full name.
    name: EmployeeName,

    /// The employee's job title.
    role: Role,

    /// The employee's monthly salary.
    salary: Salary,
}

impl EmployeeData {
    /// Attaches a datastore-assigned `id` to the validated fields, yielding the
    /// full employee record.
    pub(crate) fn into_employee(self, id: EmployeeId) -> Employee {
        Employee::new(id, self.name, self.role, self.salary)
    }
}

/// Validates the writable fields of an employee, collecting all violations.
///
/// Contrary to the constructors of the individual field types, this does not
/// stop at the first problem: the caller gets every violation that applies so
/// it can surface them together.  Missing fields fail the check of the field
/// they belong to.
pub(crate) fn validate_employee(
    name: Option<&str>,
    role: Option<&str>,
    salary: Option<f64>,
) -> Result<EmployeeData, Vec<ModelError>> {
    let mut violations = vec![];

    let name = match EmployeeName::new(name.unwrap_or("")) {
        Ok(name) => Some(name),
        Err(e) => {
            violations.push(e);
            None
        }
    };

    let role = match Role::new(role.unwrap_or("")) {
        Ok(role) => Some(role),
        Err(e) => {
            violations.push(e);
            None
        }
    };

    let salary = match salary.map(Salary::new) {
        Some(Ok(salary)) => Some(salary),
        Some(Err(e)) => {
            violations.push(e);
            None
        }
        None => {
            violations.push(ModelError("Salary must be a non-negative number".to_owned()));
            None
        }
    };

    match (name, role, salary) {
        (Some(name), Some(role), Some(salary)) => {
            debug_assert!(violations.is_empty());
            Ok(EmployeeData { name, role, salary })
        }
        _ => Err(violations),
    }
}

/// Resolved pagination parameters of a listing request.
///
/// Out-of-range inputs are clamped rather than rejected: the page is at least
/// `DEFAULT_PAGE` and the limit lies within `[1, MAX_LIMIT]`.
#[derive(Clone, Copy, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct PageParams {
    /// The 1-indexed page to return.
    page: i64,

    /// The maximum number of records in the page.
    limit: i64,
}

impl PageParams {
    /// Computes the effective page and limit from the raw query parameters.
    pub(crate) fn resolve(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(DEFAULT_PAGE).max(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// Returns the number of records that precede the requested page.
    pub(crate) fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Pagination details echoed back alongside a page of records.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct PageInfo {
    /// The 1-indexed page that was returned.
    page: i64,

    /// The page size that was applied.
    limit: i64,

    /// Total number of records in the datastore, independent of the page.
    total: i64,
}

/// One page of employee records plus the pagination details that produced it.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct EmployeePage {
    /// The records of the requested page, in insertion order.
    data: Vec<Employee>,

    /// The resolved pagination parameters and the total record count.
    pagination: PageInfo,
}
