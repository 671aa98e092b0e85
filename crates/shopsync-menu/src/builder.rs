//! Builds the category → department → sub-department menu tree.

use rand::Rng;
use shopsync_core::{title_key, Department, SubDepartment};

use crate::document::{MenuDocument, MenuNode};
use crate::ids::MenuIdGenerator;
use crate::index::CollectionIndex;
use crate::taxonomy::{Category, CATEGORIES};

/// Maps the fixed taxonomy onto the POS departments and wraps the result
/// under the "Products" root.
///
/// Sub-departments need a matching collection to appear and are suppressed
/// when titled like their department. A department appears when it has a
/// collection of its own or at least one surviving sub-department, and a
/// category appears when at least one of its departments does.
pub fn build_menu<R: Rng>(
    collections: &CollectionIndex,
    departments: &[Department],
    sub_departments: &[SubDepartment],
    ids: &mut MenuIdGenerator<R>,
) -> MenuDocument {
    let categories: Vec<MenuNode> = CATEGORIES
        .iter()
        .filter_map(|category| {
            category_node(category, collections, departments, sub_departments, ids)
        })
        .collect();

    MenuDocument::new(MenuNode::products_root(ids.next_id(), categories))
}

fn category_node<R: Rng>(
    category: &Category,
    collections: &CollectionIndex,
    departments: &[Department],
    sub_departments: &[SubDepartment],
    ids: &mut MenuIdGenerator<R>,
) -> Option<MenuNode> {
    let department_nodes: Vec<MenuNode> = departments
        .iter()
        .filter(|d| {
            d.group_id
                .as_ref()
                .is_some_and(|g| g.as_str().eq_ignore_ascii_case(category.group_id))
        })
        .filter_map(|department| department_node(department, collections, sub_departments, ids))
        .collect();

    if department_nodes.is_empty() {
        tracing::debug!(category = category.name, "category has no menu departments");
        return None;
    }
    tracing::debug!(
        category = category.name,
        departments = department_nodes.len(),
        "category added to menu"
    );
    Some(MenuNode::branch(
        ids.next_id(),
        category.name,
        None,
        department_nodes,
    ))
}

fn department_node<R: Rng>(
    department: &Department,
    collections: &CollectionIndex,
    sub_departments: &[SubDepartment],
    ids: &mut MenuIdGenerator<R>,
) -> Option<MenuNode> {
    let department_key = title_key(&department.title);

    let leaves: Vec<MenuNode> = sub_departments
        .iter()
        .filter(|sub| sub.department_id == department.id)
        .filter(|sub| title_key(&sub.title) != department_key)
        .filter_map(|sub| {
            let collection = collections.find_match(&sub.title)?;
            Some(MenuNode::leaf(ids.next_id(), &sub.title, collection))
        })
        .collect();

    let own_collection = collections.find_match(&department.title);
    if leaves.is_empty() && own_collection.is_none() {
        return None;
    }
    Some(MenuNode::branch(
        ids.next_id(),
        &department.title,
        own_collection,
        leaves,
    ))
}
