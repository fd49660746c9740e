use empire_world::value::atoi;
use empire_world::{EmpireVnum, EntityRef, World};

use super::FieldFn;
use crate::exec::Exec;
use crate::lookup::uid_arg;
use crate::text::flag;

pub(super) const FIELDS: &[(&str, FieldFn<EmpireVnum>)] = &[
    ("adjective", adjective),
    ("coins", coins),
    ("id", id),
    ("is_hostile", is_hostile),
    ("members", members),
    ("name", name),
];

macro_rules! getter {
    ($name:ident, |$e:ident| $body:expr) => {
        fn $name(world: &mut World, _: &Exec, vnum: EmpireVnum, _: &str) -> Option<String> {
            let $e = world.empire(vnum)?;
            Some($body.to_string())
        }
    };
}

getter!(adjective, |e| e.adjective);
getter!(coins, |e| e.coins);
getter!(id, |e| e.vnum);
getter!(members, |e| e.members);
getter!(name, |e| e.name);

/// An empire by id, vnum or (abbreviated) name.
fn find_empire(world: &World, arg: &str) -> Option<EmpireVnum> {
    if let Some(uid) = uid_arg(arg) {
        return world.find_uid(uid).and_then(|e| match e {
            EntityRef::Empire(vnum) => Some(vnum),
            _ => None,
        });
    }
    if arg.starts_with(|c: char| c.is_ascii_digit()) {
        let vnum = EmpireVnum::try_from(atoi(arg)).ok()?;
        return world.empire(vnum).map(|e| e.vnum);
    }
    let lower = arg.to_ascii_lowercase();
    world
        .empires
        .values()
        .find(|e| e.name.eq_ignore_ascii_case(arg))
        .or_else(|| {
            world
                .empires
                .values()
                .find(|e| !lower.is_empty() && e.name.to_ascii_lowercase().starts_with(&lower))
        })
        .map(|e| e.vnum)
}

fn is_hostile(world: &mut World, _: &Exec, vnum: EmpireVnum, sub: &str) -> Option<String> {
    let e = world.empire(vnum)?;
    let hostile = find_empire(world, sub.trim()).is_some_and(|other| e.is_hostile(other));
    Some(flag(hostile))
}

#[cfg(test)]
mod tests {
    use super::super::entity_field;
    use crate::testing::Fixture;
    use empire_world::{Empire, EntityRef, Relation, Uid};

    #[test]
    fn diplomacy() {
        let mut fx = Fixture::new();
        let ex = fx.exec_on_mob(&["nop"]);
        let mut rome = Empire::new(1, "Rome", "Roman");
        rome.relations.insert(2, Relation::War);
        fx.world.add_empire(rome);
        fx.world.add_empire(Empire::new(2, "Carthage", "Carthaginian"));
        fx.world.add_empire(Empire::new(3, "Athens", "Athenian"));

        let rome = EntityRef::Empire(1);
        assert_eq!(entity_field(&mut fx.world, &ex, rome, "adjective", ""), "Roman");
        assert_eq!(entity_field(&mut fx.world, &ex, rome, "is_hostile", "carth"), "1");
        assert_eq!(entity_field(&mut fx.world, &ex, rome, "is_hostile", &Uid::empire(2).to_string()), "1");
        assert_eq!(entity_field(&mut fx.world, &ex, rome, "is_hostile", "3"), "0");
        assert_eq!(entity_field(&mut fx.world, &ex, rome, "is_hostile", "Sparta"), "0");
    }
}
