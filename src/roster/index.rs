use super::Employee;
use std::collections::{HashMap, HashSet};

/// How an employee's `manager_id` resolves against the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerLink<'a> {
    /// No manager recorded
    Root,
    /// Points at an id that is not in the roster
    Dangling(&'a str),
    /// Points at the employee itself
    SelfManaged,
    Resolved(&'a Employee),
}

/// Result of walking up the reporting line from one employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerChain<'a> {
    /// Managers from the direct manager upwards, each appearing once
    pub managers: Vec<&'a Employee>,

    /// Id at which the walk met an employee it had already visited
    pub cycle_at: Option<&'a str>,
}

/// Lookup structure over a borrowed roster.
///
/// The first occurrence of an id wins; later entries with the same id are
/// recorded in `duplicate_ids` and otherwise ignored.
pub struct RosterIndex<'a> {
    employees: Vec<&'a Employee>,
    by_id: HashMap<&'a str, &'a Employee>,
    reports: HashMap<&'a str, Vec<&'a Employee>>,
    duplicate_ids: Vec<&'a str>,
}

impl<'a> RosterIndex<'a> {
    pub fn new(roster: &'a [Employee]) -> Self {
        let mut employees = Vec::with_capacity(roster.len());
        let mut by_id = HashMap::with_capacity(roster.len());
        let mut duplicate_ids = Vec::new();

        for employee in roster {
            if by_id.contains_key(employee.id.as_str()) {
                if !duplicate_ids.contains(&employee.id.as_str()) {
                    duplicate_ids.push(employee.id.as_str());
                }
                continue;
            }
            by_id.insert(employee.id.as_str(), employee);
            employees.push(employee);
        }

        let mut reports: HashMap<&'a str, Vec<&'a Employee>> = HashMap::new();
        for &employee in &employees {
            if let Some(manager_id) = employee.manager_id.as_deref() {
                reports.entry(manager_id).or_default().push(employee);
            }
        }

        Self {
            employees,
            by_id,
            reports,
            duplicate_ids,
        }
    }

    /// Unique employees in roster order
    pub fn employees(&self) -> impl Iterator<Item = &'a Employee> + '_ {
        self.employees.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn get(&self, id: &str) -> Option<&'a Employee> {
        self.by_id.get(id).copied()
    }

    pub fn duplicate_ids(&self) -> &[&'a str] {
        &self.duplicate_ids
    }

    /// Employees whose `manager_id` is `id`, in roster order
    pub fn direct_reports(&self, id: &str) -> &[&'a Employee] {
        self.reports.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn resolve_manager(&self, employee: &'a Employee) -> ManagerLink<'a> {
        match employee.manager_id.as_deref() {
            None => ManagerLink::Root,
            Some(id) if id == employee.id => ManagerLink::SelfManaged,
            Some(id) => match self.get(id) {
                Some(manager) => ManagerLink::Resolved(manager),
                None => ManagerLink::Dangling(id),
            },
        }
    }

    /// Walk the reporting line upwards from `employee`.
    ///
    /// The visited set is bounded by the roster size, so the walk stops at
    /// the first repeated id instead of following a cycle forever.
    pub fn manager_chain(&self, employee: &'a Employee) -> ManagerChain<'a> {
        let mut visited: HashSet<&str> = HashSet::with_capacity(self.len() + 1);
        visited.insert(employee.id.as_str());

        let mut managers = Vec::new();
        let mut cycle_at = None;
        let mut current = employee;

        while let Some(manager_id) = current.manager_id.as_deref() {
            if visited.contains(manager_id) {
                cycle_at = Some(manager_id);
                break;
            }
            let Some(manager) = self.get(manager_id) else {
                break;
            };
            visited.insert(manager.id.as_str());
            managers.push(manager);
            current = manager;
        }

        ManagerChain { managers, cycle_at }
    }
}
