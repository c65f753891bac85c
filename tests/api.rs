use actix_http::{
    header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN},
    Method,
};
use actix_web::{
    test::{call_service, init_service, TestRequest},
    web,
};
use anyhow::Result;
use kontrakanku::create_web_app;
use serde_json::{json, Value};
use util::{call, call_raw, create_test_state, delete, demo, get, Form};

mod util;

fn id(val: &Value) -> i64 {
    val["id"].as_i64().unwrap()
}

#[actix_rt::test]
async fn demo_cannot_write() -> Result<()> {
    let (state, _dir) = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = call(
        &app,
        Form::new()
            .text("nama_unit", "A1")
            .text("harga_sewa", "500")
            .post("/api/properti"),
    )
    .await?;
    assert_eq!(status, 201);
    let unit = id(&val);

    let requests = vec![
        Form::new().text("nama_unit", "B1").post("/api/properti"),
        Form::new()
            .text("nama_unit", "B1")
            .put(&format!("/api/properti/{}", unit)),
        delete(&format!("/api/properti/{}", unit)),
        Form::new()
            .text("nama", "Budi")
            .text("telepon", "0812")
            .post("/api/penyewa"),
        Form::new().text("nama", "Budi").put("/api/penyewa/1"),
        delete("/api/penyewa/1"),
        Form::new()
            .text("penyewa_id", "1")
            .text("total_biaya", "500")
            .text("tanggal_mulai", "2024-03-15")
            .post("/api/pembayaran"),
        Form::new().put("/api/pembayaran/1"),
        delete("/api/pembayaran/1"),
        Form::new()
            .file("kwitansi", "a.jpg", b"jpeg")
            .post("/api/pembayaran/upload"),
        Form::new()
            .text("jumlah_dibayar", "100")
            .post("/api/pembayaran/1/riwayat"),
    ];
    for req in requests {
        let (val, status) = call(&app, demo(req)).await?;
        assert_eq!(status, 403);
        assert_eq!(val["code"], "DEMO_ACCESS_DENIED");
        assert_eq!(val["status_code"], 403);
    }

    let (val, _) = call(&app, get("/api/properti")).await?;
    assert_eq!(val.as_array().unwrap().len(), 1);
    assert_eq!(val[0]["nama_unit"], "A1");
    let (val, _) = call(&app, get("/api/penyewa")).await?;
    assert_eq!(val, json!([]));
    let (val, _) = call(&app, get("/api/pembayaran")).await?;
    assert_eq!(val, json!([]));

    // reads stay open
    let (_, status) = call(&app, demo(get("/api/dashboard/stats"))).await?;
    assert_eq!(status, 200);
    Ok(())
}

#[actix_rt::test]
async fn rental_flow() -> Result<()> {
    let (state, _dir) = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = call(
        &app,
        Form::new()
            .text("nama_unit", "Kamar 1")
            .text("tipe", "Kos")
            .text("harga_sewa", "1000000")
            .text("status", "kosong")
            .file("foto", "kamar.JPG", b"photo-bytes")
            .post("/api/properti"),
    )
    .await?;
    assert_eq!(status, 201);
    let unit = id(&val);
    let photo = val["foto_path"].as_str().unwrap().to_owned();
    assert!(photo.starts_with("/uploads/properti/"));
    assert!(photo.ends_with(".jpg"));

    let (body, status) = call_raw(&app, get(&photo)).await?;
    assert_eq!(status, 200);
    assert_eq!(body, b"photo-bytes");

    // stored files are fetched cross origin by the frontend
    let res = call_service(
        &app,
        get(&photo)
            .insert_header((ORIGIN, "http://localhost:5173"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(
        res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:5173"))
    );

    let (val, status) = call(
        &app,
        Form::new()
            .text("nama", "Budi")
            .text("telepon", "0812")
            .text("nik", "3201")
            .file("ktp", "ktp.png", b"ktp")
            .post("/api/penyewa"),
    )
    .await?;
    assert_eq!(status, 201);
    let tenant = id(&val);
    assert!(val["ktp_path"].as_str().unwrap().starts_with("/uploads/ktp/"));

    let (val, _) = call(&app, get("/api/penyewa")).await?;
    assert_eq!(val[0]["status_bayar"], "Belum Ada Kontrak");
    assert_eq!(val[0]["properti_id"], 0);

    let (val, status) = call(
        &app,
        Form::new()
            .text("penyewa_id", &tenant.to_string())
            .text("properti_id", &unit.to_string())
            .text("total_biaya", "1000")
            .text("uang_dibayar", "400")
            .text("tanggal_mulai", "2024-03-15T10:00:00Z")
            .text("tanggal_akhir", "")
            .text("metode_bayar", "Tunai")
            .file("kwitansi", "bukti.pdf", b"pdf")
            .post("/api/pembayaran"),
    )
    .await?;
    assert_eq!(status, 201);
    assert_eq!(val["message"], "Kontrak berhasil dibuat");
    let contract = id(&val);
    assert!(val["kwitansi_path"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/kwitansi/"));

    let (val, _) = call(&app, get("/api/pembayaran")).await?;
    assert_eq!(val[0]["id"], contract);
    assert_eq!(val[0]["nama_penyewa"], "Budi");
    assert_eq!(val[0]["nik"], "3201");
    assert_eq!(val[0]["properti_id"], unit);
    assert_eq!(val[0]["nominal"], 1000.0);
    assert_eq!(val[0]["uang_dibayar"], 400.0);
    assert_eq!(val[0]["tanggal_mulai"], "2024-03-15");
    assert_eq!(val[0]["tanggal_akhir"], Value::Null);
    assert_eq!(val[0]["metode_bayar"], "Tunai");
    assert_eq!(val[0]["status"], "pending");
    assert_eq!(val[0]["keterangan"], "Kontrak sewa dari 2024-03-15 sampai ");

    let (val, _) = call(&app, get("/api/penyewa")).await?;
    assert_eq!(val[0]["status_bayar"], "Kurang Bayar");
    assert_eq!(val[0]["nama_properti"], "Kamar 1");
    assert_eq!(val[0]["foto_properti"], photo.as_str());
    assert_eq!(val[0]["mulai_kontrak"], "2024-03-15");
    assert_eq!(val[0]["jatuh_tempo"], "2024-04-15");

    let (val, _) = call(&app, get("/api/properti")).await?;
    assert_eq!(val[0]["status"], "terisi");
    assert_eq!(val[0]["nama_penyewa"], "Budi");

    let path = format!("/api/pembayaran/{}/riwayat", contract);
    let (val, status) = call(
        &app,
        Form::new()
            .text("jumlah_dibayar", "600")
            .text("tanggal_bayar", "2024-04-01")
            .text("keterangan", "pelunasan")
            .post(&path),
    )
    .await?;
    assert_eq!(status, 201);
    assert_eq!(val["message"], "Riwayat pembayaran berhasil ditambahkan");

    let (val, status) = call(&app, get(&path)).await?;
    assert_eq!(status, 200);
    assert_eq!(val.as_array().unwrap().len(), 2);
    assert_eq!(val[0]["jumlah_dibayar"], 400.0);
    assert_eq!(val[0]["total_sampai_sini"], 400.0);
    assert_eq!(val[1]["tanggal_bayar"], "2024-04-01 00:00:00");
    assert_eq!(val[1]["metode_bayar"], "Transfer");
    assert_eq!(val[1]["keterangan"], "pelunasan");
    assert_eq!(val[1]["total_sampai_sini"], 1000.0);

    let (val, _) = call(&app, get("/api/penyewa")).await?;
    assert_eq!(val[0]["status_bayar"], "Lunas");
    assert_eq!(val[0]["uang_dibayar"], 1000.0);

    let (val, status) = call(&app, get("/api/dashboard/stats")).await?;
    assert_eq!(status, 200);
    assert_eq!(val["totalPendapatan"], 1000.0);
    assert_eq!(val["unitTerisi"], 1);
    assert_eq!(val["totalUnit"], 1);

    let (val, status) = call(
        &app,
        Form::new()
            .text("penyewa_id", &tenant.to_string())
            .text("total_biaya", "1000")
            .text("tanggal_mulai", "2024-03-15")
            .text("tanggal_akhir", "2025-03-15")
            .text("status", "lunas")
            .put(&format!("/api/pembayaran/{}", contract)),
    )
    .await?;
    assert_eq!(status, 200, "{}", val);
    assert_eq!(val["id"], contract);
    assert_eq!(val["message"], "Pembayaran berhasil diupdate");
    let (val, _) = call(&app, get("/api/pembayaran")).await?;
    assert_eq!(val[0]["status"], "lunas");
    assert_eq!(val[0]["tanggal_akhir"], "2025-03-15");
    assert!(val[0]["kwitansi_path"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/kwitansi/"));

    let (val, status) = call(
        &app,
        Form::new()
            .text("nama_unit", "Kamar 1A")
            .text("tipe", "Kos")
            .text("harga_sewa", "1200000")
            .text("status", "terisi")
            .put(&format!("/api/properti/{}", unit)),
    )
    .await?;
    assert_eq!(status, 200, "{}", val);
    assert_eq!(val["id"], unit);
    assert_eq!(val["message"], "Properti updated successfully");

    let (val, status) = call(
        &app,
        Form::new()
            .text("nama", "Budi Santoso")
            .text("telepon", "0812")
            .put(&format!("/api/penyewa/{}", tenant)),
    )
    .await?;
    assert_eq!(status, 200, "{}", val);
    assert_eq!(val["id"], tenant);
    assert_eq!(val["message"], "Penyewa updated successfully");

    let (val, status) = call(&app, delete(&format!("/api/pembayaran/{}", contract))).await?;
    assert_eq!(status, 200);
    assert_eq!(val["id"], contract);
    let (val, _) = call(&app, get(&path)).await?;
    assert_eq!(val, json!([]));

    let (val, status) = call(&app, delete(&format!("/api/penyewa/{}", tenant))).await?;
    assert_eq!(status, 200);
    assert_eq!(val["id"], tenant);
    let (val, status) = call(&app, delete(&format!("/api/properti/{}", unit))).await?;
    assert_eq!(status, 200);
    assert_eq!(val["id"], unit);
    let (val, _) = call(&app, get("/api/properti")).await?;
    assert_eq!(val, json!([]));
    Ok(())
}

#[actix_rt::test]
async fn errors() -> Result<()> {
    let (state, dir) = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = call(
        &app,
        Form::new()
            .text("nama", "Budi")
            .file("ktp", "ktp.png", b"ktp")
            .post("/api/penyewa"),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(val["code"], "VALIDATION_ERROR");
    assert_eq!(val["error"], "Nama dan telepon wajib diisi");
    // the document of a rejected request is not kept
    let ktp_dir = dir.path().join("ktp");
    let kept = std::fs::read_dir(&ktp_dir)
        .map(|d| d.count())
        .unwrap_or_default();
    assert_eq!(kept, 0);

    let (val, status) = call(
        &app,
        Form::new()
            .text("nama", "Budi")
            .text("telepon", "0812")
            .put("/api/penyewa/999"),
    )
    .await?;
    assert_eq!(status, 404);
    assert_eq!(val["code"], "NOT_FOUND");

    let (_, status) = call(&app, delete("/api/properti/999")).await?;
    assert_eq!(status, 404);
    let (_, status) = call(&app, delete("/api/pembayaran/999")).await?;
    assert_eq!(status, 404);

    let (val, status) = call(
        &app,
        Form::new()
            .text("total_biaya", "500")
            .post("/api/pembayaran"),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(
        val["error"],
        "Penyewa, total biaya, dan tanggal mulai wajib diisi"
    );

    let (val, _) = call(
        &app,
        Form::new()
            .text("nama", "Budi")
            .text("telepon", "0812")
            .post("/api/penyewa"),
    )
    .await?;
    let tenant = id(&val).to_string();

    let (val, status) = call(
        &app,
        Form::new()
            .text("penyewa_id", &tenant)
            .text("total_biaya", "500")
            .text("tanggal_mulai", "15/03/2024")
            .post("/api/pembayaran"),
    )
    .await?;
    assert_eq!(status, 400);
    assert_eq!(val["code"], "VALIDATION_ERROR");

    let (val, status) = call(
        &app,
        Form::new()
            .text("penyewa_id", &tenant)
            .text("total_biaya", "lima ratus")
            .text("tanggal_mulai", "2024-03-15")
            .post("/api/pembayaran"),
    )
    .await?;
    assert_eq!(status, 400, "{}", val);

    let (val, status) = call(
        &app,
        Form::new()
            .text("penyewa_id", &tenant)
            .text("total_biaya", "500")
            .text("tanggal_mulai", "2024-03-15")
            .text("status", "batal")
            .post("/api/pembayaran"),
    )
    .await?;
    assert_eq!(status, 400, "{}", val);

    let (val, status) = call(
        &app,
        Form::new()
            .text("penyewa_id", &tenant)
            .text("total_biaya", "500")
            .text("tanggal_mulai", "2024-03-15")
            .post("/api/pembayaran"),
    )
    .await?;
    assert_eq!(status, 201);
    let contract = id(&val);

    let (val, status) = call(&app, delete(&format!("/api/penyewa/{}", tenant))).await?;
    assert_eq!(status, 409);
    assert_eq!(val["code"], "CONFLICT");

    let riwayat = format!("/api/pembayaran/{}/riwayat", contract);
    let (_, status) = call(&app, Form::new().text("jumlah_dibayar", "0").post(&riwayat)).await?;
    assert_eq!(status, 400);
    let (_, status) = call(&app, Form::new().post(&riwayat)).await?;
    assert_eq!(status, 400);
    let (_, status) = call(
        &app,
        Form::new()
            .text("jumlah_dibayar", "10")
            .post("/api/pembayaran/999/riwayat"),
    )
    .await?;
    assert_eq!(status, 404);
    // unknown contracts have no history
    let (val, status) = call(&app, get("/api/pembayaran/999/riwayat")).await?;
    assert_eq!(status, 200);
    assert_eq!(val, json!([]));
    Ok(())
}

#[actix_rt::test]
async fn upload_receipt() -> Result<()> {
    let (state, dir) = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let (val, status) = call(&app, Form::new().text("x", "y").post("/api/pembayaran/upload")).await?;
    assert_eq!(status, 400);
    assert_eq!(val["error"], "File tidak ditemukan");

    let (val, status) = call(
        &app,
        Form::new()
            .file("kwitansi", "bukti.png", b"png")
            .post("/api/pembayaran/upload"),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["message"], "Upload berhasil");
    let filename = val["filename"].as_str().unwrap();
    assert_eq!(
        val["path"],
        format!("/uploads/kwitansi/{}", filename).as_str()
    );
    assert_eq!(
        std::fs::read(dir.path().join("kwitansi").join(filename))?,
        b"png"
    );
    Ok(())
}

#[actix_rt::test]
async fn login() -> Result<()> {
    let (state, _dir) = create_test_state().await?;
    let app = init_service(create_web_app(web::Data::new(state))).await;

    let post = |data: Value| {
        TestRequest::with_uri("/api/auth/login")
            .method(Method::POST)
            .set_json(data)
    };

    let (val, status) = call(&app, post(json!({"nama": "admin", "password": "321"}))).await?;
    assert_eq!(status, 200);
    assert_eq!(val["success"], true);
    assert_eq!(val["user"]["nama"], "admin");
    assert_eq!(val["user"]["role"], "admin");

    let (val, _) = call(&app, post(json!({"nama": "demo", "password": "demo123"}))).await?;
    assert_eq!(val["user"]["role"], "demo");

    let (val, status) = call(&app, post(json!({"nama": "admin", "password": "x"}))).await?;
    assert_eq!(status, 401);
    assert_eq!(val["code"], "UNAUTHORIZED");
    assert_eq!(val["error"], "Nama pengguna atau password salah");

    let (val, status) = call(&app, post(json!({"nama": "admin"}))).await?;
    assert_eq!(status, 400);
    assert_eq!(val["error"], "Data login tidak valid");

    let (val, status) = call(
        &app,
        TestRequest::with_uri("/api/auth/logout").method(Method::POST),
    )
    .await?;
    assert_eq!(status, 200);
    assert_eq!(val["message"], "Logout berhasil");
    Ok(())
}
