#![no_main]

use libfuzzer_sys::fuzz_target;
use memberscope::prelude::*;

// Each pair of input bytes is one registry operation over a fixed set of members.
fuzz_target!(|data: &[u8]| {
    let relation = |target: TypeId, source: TypeId| target.value() <= source.value();
    let members: Vec<MemberDescriptor> = (0u32..4)
        .map(|row| {
            MemberDescriptor::new(
                Token::from_parts(MemberKind::Property.table(), row + 1),
                if row % 2 == 0 { "Amount" } else { "Name" },
                TypeId::new(0x0200_0001 + row),
                MemberKind::Property,
            )
        })
        .collect();

    let mut registry: MemberMapRegistry<MemberDescriptor> = MemberMapRegistry::new();
    for pair in data.chunks(2) {
        let arg = usize::from(pair.get(1).copied().unwrap_or(0));
        let member = members[arg % members.len()].clone();
        let before = registry.len();

        match pair[0] % 6 {
            0 => {
                registry.add(member);
                assert_eq!(registry.len(), before + 1);
            }
            1 => {
                if registry.insert(arg, member.clone()).is_ok() {
                    assert_eq!(registry.get(arg).unwrap(), &member);
                } else {
                    assert!(arg > before);
                }
            }
            2 => {
                if registry.remove_at(arg).is_ok() {
                    assert_eq!(registry.len(), before - 1);
                }
            }
            3 => {
                let removed = registry.remove(&member);
                assert_eq!(removed, registry.len() + 1 == before);
            }
            4 => {
                assert_eq!(
                    registry.index_of(&member).is_none(),
                    !registry.contains(&member)
                );
            }
            _ => {
                let snapshot = registry.clone();
                let _ = registry.find(&member, &relation);
                assert_eq!(registry, snapshot);
            }
        }
    }
});
