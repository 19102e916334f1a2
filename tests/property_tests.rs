use proptest::prelude::*;
use std::collections::BTreeSet;
use vsfilters::hierarchy::GroupHierarchy;
use vsfilters::project::ItemManifest;
use vsfilters::scanner::FileEntry;

fn relative_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec("[a-c]{1,2}", 0..4),
        "[a-z]{1,4}",
        prop::sample::select(vec!["cpp", "c", "h", "hpp", "txt"]),
    )
        .prop_map(|(dirs, stem, ext)| {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&format!("{stem}.{ext}"));
            path
        })
}

fn entries() -> impl Strategy<Value = Vec<FileEntry>> {
    prop::collection::vec(relative_path(), 0..24)
        .prop_map(|paths| paths.iter().map(|p| FileEntry::new(p)).collect())
}

fn expected_groups(entries: &[FileEntry]) -> BTreeSet<String> {
    let mut groups = BTreeSet::new();
    for entry in entries.iter().filter(|e| e.role.is_buildable()) {
        let mut prefix = String::new();
        for segment in entry.group().split('/').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            groups.insert(prefix.clone());
        }
    }
    groups
}

const BASE: &str = "<Project>\n  <ItemGroup>\n    <ClCompile Include=\"a\\x.cpp\" />\n  </ItemGroup>\n  <ItemGroup>\n    <ClInclude Include=\"y.h\" />\n  </ItemGroup>\n</Project>\n";

proptest! {
    #[test]
    fn test_one_group_per_directory_prefix(entries in entries()) {
        let hierarchy = GroupHierarchy::derive(&entries);
        let paths: BTreeSet<String> = hierarchy.paths().into_iter().map(String::from).collect();

        prop_assert_eq!(paths, expected_groups(&entries));
        prop_assert_eq!(hierarchy.len(), hierarchy.paths().len());
    }

    #[test]
    fn test_every_parent_is_present(entries in entries()) {
        let hierarchy = GroupHierarchy::derive(&entries);
        for node in hierarchy.iter() {
            if !node.parent_path.is_empty() {
                prop_assert!(hierarchy.contains(&node.parent_path));
            }
        }
    }

    #[test]
    fn test_group_ids_are_unique(entries in entries()) {
        let hierarchy = GroupHierarchy::derive(&entries);
        let ids: BTreeSet<_> = hierarchy.iter().map(|n| n.id.to_string()).collect();
        prop_assert_eq!(ids.len(), hierarchy.len());
    }

    #[test]
    fn test_merge_is_additive(entries in entries()) {
        let mut manifest = ItemManifest::parse(BASE);
        let plan = manifest.plan(&entries);
        manifest.apply(&plan);
        let merged = manifest.render();

        // Original lines survive in order.
        let mut remaining = merged.lines();
        for line in BASE.lines() {
            prop_assert!(remaining.any(|l| l == line));
        }

        // Every buildable entry is declared afterwards.
        let reparsed = ItemManifest::parse(&merged);
        for entry in entries.iter().filter(|e| e.role.is_buildable()) {
            prop_assert!(reparsed.declares(&entry.relative_path, entry.role));
        }

        // A second merge has nothing left to add.
        prop_assert!(reparsed.plan(&entries).is_empty());
    }
}
