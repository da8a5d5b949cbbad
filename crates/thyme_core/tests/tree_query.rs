use thyme_core::{
    ancestors, check_integrity, children_of, has_children, is_descendant, parent_candidates,
    IntegrityViolation, Project,
};
use uuid::Uuid;

/// Builds `[1 (root), 2 (child of 1), 3 (child of 2)]`.
fn chain() -> Vec<Project> {
    let one = Project::new("One", None);
    let two = Project::new("Two", Some(one.id));
    let three = Project::new("Three", Some(two.id));
    vec![one, two, three]
}

#[test]
fn self_reparent_is_always_a_cycle() {
    let projects = chain();
    for project in &projects {
        assert!(is_descendant(project.id, Some(project.id), &projects));
    }
    let unknown = Uuid::new_v4();
    assert!(is_descendant(unknown, Some(unknown), &[]));
}

#[test]
fn root_target_is_never_a_descendant() {
    let projects = chain();
    for project in &projects {
        assert!(!is_descendant(project.id, None, &projects));
    }
}

#[test]
fn descendant_check_follows_downward_path_only() {
    let projects = chain();
    let (one, two, three) = (projects[0].id, projects[1].id, projects[2].id);

    assert!(is_descendant(one, Some(three), &projects));
    assert!(is_descendant(one, Some(two), &projects));
    assert!(is_descendant(two, Some(three), &projects));
    assert!(!is_descendant(three, Some(one), &projects));
    assert!(!is_descendant(two, Some(one), &projects));
}

#[test]
fn disjoint_branch_is_not_a_descendant() {
    let mut projects = chain();
    let other_root = Project::new("Other", None);
    let other_child = Project::new("Other child", Some(other_root.id));
    projects.push(other_root.clone());
    projects.push(other_child.clone());

    assert!(!is_descendant(projects[0].id, Some(other_child.id), &projects));
    assert!(!is_descendant(other_root.id, Some(projects[2].id), &projects));
}

#[test]
fn children_of_preserves_list_order() {
    let root = Project::new("Root", None);
    let b = Project::new("B", Some(root.id));
    let nested = Project::new("Nested", Some(b.id));
    let a = Project::new("A", Some(root.id));
    let projects = vec![root.clone(), b.clone(), nested, a.clone()];

    let children = children_of(Some(root.id), &projects);
    assert_eq!(
        children.iter().map(|project| project.id).collect::<Vec<_>>(),
        vec![b.id, a.id]
    );

    let roots = children_of(None, &projects);
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, root.id);
}

#[test]
fn children_lookup_matches_scenario() {
    let projects = chain();
    let children = children_of(Some(projects[1].id), &projects);
    assert_eq!(children, vec![&projects[2]]);
    assert!(has_children(projects[1].id, &projects));
    assert!(!has_children(projects[2].id, &projects));
}

#[test]
fn ancestors_are_nearest_first() {
    let projects = chain();
    let found = ancestors(projects[2].id, &projects);
    assert_eq!(
        found.iter().map(|project| project.id).collect::<Vec<_>>(),
        vec![projects[1].id, projects[0].id]
    );
    assert!(ancestors(projects[0].id, &projects).is_empty());
}

#[test]
fn parent_candidates_exclude_self_and_subtree() {
    let mut projects = chain();
    let other = Project::new("Other", None);
    projects.push(other.clone());

    let candidates = parent_candidates(projects[1].id, &projects)
        .iter()
        .map(|project| project.id)
        .collect::<Vec<_>>();
    assert_eq!(candidates, vec![projects[0].id, other.id]);
}

#[test]
fn integrity_check_reports_dangling_parent_and_cycle() {
    assert_eq!(check_integrity(&chain()), Ok(()));

    let missing = Uuid::new_v4();
    let dangling = Project::new("Dangling", Some(missing));
    assert_eq!(
        check_integrity(&[dangling.clone()]),
        Err(IntegrityViolation::DanglingParent {
            project_id: dangling.id,
            parent_id: missing,
        })
    );

    let mut a = Project::new("A", None);
    let b = Project::new("B", Some(a.id));
    a.parent = Some(b.id);
    assert!(matches!(
        check_integrity(&[a, b]),
        Err(IntegrityViolation::Cycle(_))
    ));

    let twin = Project::new("Twin", None);
    assert_eq!(
        check_integrity(&[twin.clone(), twin.clone()]),
        Err(IntegrityViolation::DuplicateId(twin.id))
    );
}
