use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_faculty_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return ok(&req.id, json!({ "faculty": [] }));
    };

    let mut stmt = match conn.prepare(
        "SELECT f.id, f.code, f.title, f.university_email, f.status, f.date_of_joining,
                d.title, p.first_name, p.last_name
         FROM faculty f
         JOIN person p ON p.id = f.person_id
         LEFT JOIN designation d ON d.id = f.designation_id
         ORDER BY f.code",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let rows = stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let code: i64 = row.get(1)?;
            let title: String = row.get(2)?;
            let university_email: Option<String> = row.get(3)?;
            let status: String = row.get(4)?;
            let date_of_joining: String = row.get(5)?;
            let designation: Option<String> = row.get(6)?;
            let first_name: String = row.get(7)?;
            let last_name: String = row.get(8)?;
            Ok(json!({
                "id": id,
                "code": code,
                "title": title,
                "universityEmail": university_email,
                "status": status,
                "dateOfJoining": date_of_joining,
                "designation": designation,
                "firstName": first_name,
                "lastName": last_name
            }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(faculty) => ok(&req.id, json!({ "faculty": faculty })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_persons_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return ok(&req.id, json!({ "persons": [] }));
    };

    let mut stmt = match conn.prepare(
        "SELECT p.id, p.first_name, p.last_name, p.sex, p.dob, p.cnic, p.email, p.phone,
                (SELECT COUNT(*) FROM qualification q WHERE q.person_id = p.id)
         FROM person p
         ORDER BY p.id",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    // CNIC decrypts at read time only.
    let cipher = &state.cipher;
    let rows = stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let first_name: String = row.get(1)?;
            let last_name: String = row.get(2)?;
            let sex: String = row.get(3)?;
            let dob: Option<String> = row.get(4)?;
            let cnic: Option<String> = row.get(5)?;
            let email: Option<String> = row.get(6)?;
            let phone: Option<String> = row.get(7)?;
            let qualification_count: i64 = row.get(8)?;
            Ok(json!({
                "id": id,
                "firstName": first_name,
                "lastName": last_name,
                "sex": sex,
                "dob": dob,
                "cnic": cnic.map(|c| cipher.reveal(&c)),
                "email": email,
                "phone": phone,
                "qualificationCount": qualification_count
            }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(persons) => ok(&req.id, json!({ "persons": persons })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "faculty.list" => Some(handle_faculty_list(state, req)),
        "persons.list" => Some(handle_persons_list(state, req)),
        _ => None,
    }
}
